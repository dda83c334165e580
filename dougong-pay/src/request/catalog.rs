//! Field tables for every gateway operation.
//!
//! Required fields carry the label used in `MissingField` messages. Optional
//! allow-lists are ordered: the payload follows the same order.

use super::{Check, ConditionalGroup, RequestSpec, Rule};
use crate::validator::Pattern;

const YES_NO: &[&str] = &["Y", "N"];
const FEE_FLAGS: &[&str] = &["1", "2"];

/// Channel codes accepted by aggregated payment creation.
pub const TRADE_TYPES: &[&str] = &[
    "A_NATIVE", "A_JSAPI", "T_MINIAPP", "T_JSAPI", "U_NATIVE", "U_JSAPI", "D_NATIVE", "T_H5",
    "T_APP", "T_NATIVE",
];

const fn rule(field: &'static str, check: Check) -> Rule {
    Rule { field, check }
}

pub(super) static CREATE_PAYMENT: RequestSpec = RequestSpec {
    required: &[
        ("req_seq_id", "请求流水号"),
        ("huifu_id", "商户号"),
        ("trade_type", "交易类型"),
        ("goods_desc", "商品描述"),
        ("trans_amt", "交易金额"),
    ],
    conditional: &[],
    optional: &[
        "acct_id",
        "time_expire",
        "notify_url",
        "wx_data",
        "alipay_data",
        "unionpay_data",
        "dc_data",
        "delay_acct_flag",
        "fee_flag",
        "acct_split_bunch",
        "term_div_coupon_type",
        "combinedpay_data",
        "combinedpay_data_fee_info",
        "limit_pay_type",
        "fq_mer_discount_flag",
        "channel_no",
        "pay_scene",
        "remark",
        "risk_check_data",
        "terminal_device_data",
        "trans_fee_allowance_info",
    ],
    rules: &[
        rule("req_date", Check::Pattern(Pattern::Date)),
        rule("trade_type", Check::OneOf(TRADE_TYPES)),
        rule("trans_amt", Check::Amount),
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("req_seq_id", Check::MaxLength(128)),
        rule("goods_desc", Check::MaxLength(127)),
        rule("time_expire", Check::Pattern(Pattern::DateTime)),
        rule("delay_acct_flag", Check::OneOf(YES_NO)),
        rule("fee_flag", Check::OneOf(FEE_FLAGS)),
    ],
    default_request_date: true,
};

pub(super) static CLOSE: RequestSpec = RequestSpec {
    required: &[
        ("req_date", "请求日期"),
        ("req_seq_id", "请求流水号"),
        ("huifu_id", "商户号"),
        ("org_req_date", "原交易请求日期"),
    ],
    conditional: &[ConditionalGroup {
        fields: &["org_hf_seq_id", "org_req_seq_id"],
        message: "org_hf_seq_id、org_req_seq_id 两个参数必填其一",
    }],
    optional: &[],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("req_date", Check::Pattern(Pattern::Date)),
        rule("org_req_date", Check::Pattern(Pattern::Date)),
        rule("req_seq_id", Check::MaxLength(128)),
        rule("org_hf_seq_id", Check::MaxLength(128)),
        rule("org_req_seq_id", Check::MaxLength(128)),
    ],
    default_request_date: false,
};

pub(super) static CLOSE_QUERY: RequestSpec = RequestSpec {
    required: &[
        ("req_date", "请求日期"),
        ("req_seq_id", "请求流水号"),
        ("huifu_id", "商户号"),
        ("org_req_date", "原交易请求日期"),
    ],
    conditional: &[ConditionalGroup {
        fields: &["org_req_seq_id", "org_hf_seq_id"],
        message: "org_req_seq_id、org_hf_seq_id 两个参数必填其一",
    }],
    optional: &[],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("req_date", Check::Pattern(Pattern::Date)),
        rule("org_req_date", Check::Pattern(Pattern::Date)),
        rule("req_seq_id", Check::MaxLength(128)),
        rule("org_req_seq_id", Check::MaxLength(128)),
        rule("org_hf_seq_id", Check::MaxLength(128)),
    ],
    default_request_date: false,
};

pub(super) static MICROPAY: RequestSpec = RequestSpec {
    required: &[
        ("req_date", "请求日期"),
        ("req_seq_id", "请求流水号"),
        ("huifu_id", "商户号"),
        ("trans_amt", "交易金额"),
        ("goods_desc", "商品描述"),
        ("auth_code", "支付授权码"),
        ("risk_check_data", "安全信息"),
    ],
    conditional: &[],
    optional: &[
        "time_expire",
        "fee_flag",
        "limit_pay_type",
        "delay_acct_flag",
        "channel_no",
        "combinedpay_data",
        "combinedpay_data_fee_info",
        "pay_scene",
        "acct_split_bunch",
        "term_div_coupon_type",
        "wx_data",
        "alipay_data",
        "unionpay_data",
        "terminal_device_info",
        "notify_url",
        "remark",
        "acct_id",
        "trans_fee_allowance_info",
    ],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("req_date", Check::Pattern(Pattern::Date)),
        rule("trans_amt", Check::Amount),
        rule("req_seq_id", Check::MaxLength(128)),
        rule("goods_desc", Check::MaxLength(127)),
        rule("auth_code", Check::MaxLength(128)),
        rule("time_expire", Check::Pattern(Pattern::DateTime)),
        rule("fee_flag", Check::OneOf(FEE_FLAGS)),
        rule("delay_acct_flag", Check::OneOf(YES_NO)),
        rule("term_div_coupon_type", Check::OneOf(&["1", "2", "3"])),
        rule("limit_pay_type", Check::MaxLength(128)),
        rule("channel_no", Check::MaxLength(32)),
        rule("pay_scene", Check::MaxLength(2)),
        rule("notify_url", Check::MaxLength(512)),
        rule("remark", Check::MaxLength(255)),
        rule("acct_id", Check::MaxLength(9)),
    ],
    default_request_date: false,
};

pub(super) static QUERY: RequestSpec = RequestSpec {
    required: &[("huifu_id", "商户号")],
    conditional: &[ConditionalGroup {
        fields: &["out_ord_id", "org_hf_seq_id", "org_req_seq_id"],
        message: "out_ord_id、org_hf_seq_id、org_req_seq_id 三个参数必填其一",
    }],
    optional: &["org_req_date"],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("org_req_date", Check::Pattern(Pattern::Date)),
        rule("out_ord_id", Check::MaxLength(32)),
        rule("org_hf_seq_id", Check::MaxLength(128)),
        rule("org_req_seq_id", Check::MaxLength(128)),
    ],
    default_request_date: false,
};

pub(super) static REFUND: RequestSpec = RequestSpec {
    required: &[
        ("req_date", "请求日期"),
        ("req_seq_id", "请求流水号"),
        ("huifu_id", "商户号"),
        ("ord_amt", "申请退款金额"),
        ("org_req_date", "原交易请求日期"),
    ],
    conditional: &[ConditionalGroup {
        fields: &["org_hf_seq_id", "org_party_order_id", "org_req_seq_id"],
        message: "org_hf_seq_id、org_party_order_id、org_req_seq_id 三个参数必填其一",
    }],
    optional: &[
        "acct_split_bunch",
        "wx_data",
        "digital_currency_data",
        "combinedpay_data",
        "combinedpay_data_fee_info",
        "remark",
        "loan_flag",
        "loan_undertaker",
        "loan_acct_type",
        "risk_check_data",
        "terminal_device_data",
        "notify_url",
        "unionpay_data",
    ],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("req_date", Check::Pattern(Pattern::Date)),
        rule("org_req_date", Check::Pattern(Pattern::Date)),
        rule("ord_amt", Check::Amount),
        rule("req_seq_id", Check::MaxLength(128)),
        rule("org_hf_seq_id", Check::MaxLength(128)),
        rule("org_party_order_id", Check::MaxLength(64)),
        rule("org_req_seq_id", Check::MaxLength(128)),
        rule("remark", Check::MaxLength(84)),
        rule("loan_flag", Check::OneOf(YES_NO)),
        rule("loan_acct_type", Check::OneOf(&["01", "05"])),
        rule("notify_url", Check::MaxLength(512)),
    ],
    default_request_date: false,
};

pub(super) static REFUND_QUERY: RequestSpec = RequestSpec {
    required: &[("huifu_id", "商户号")],
    conditional: &[ConditionalGroup {
        fields: &["org_hf_seq_id", "org_req_seq_id", "mer_ord_id"],
        message: "org_hf_seq_id、org_req_seq_id、mer_ord_id 三个参数必填其一",
    }],
    optional: &["org_req_date"],
    rules: &[
        rule("huifu_id", Check::Pattern(Pattern::MerchantId)),
        rule("org_req_date", Check::Pattern(Pattern::Date)),
        rule("org_hf_seq_id", Check::MaxLength(128)),
        rule("org_req_seq_id", Check::MaxLength(128)),
        rule("mer_ord_id", Check::MaxLength(50)),
    ],
    default_request_date: false,
};
