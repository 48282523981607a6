//! Compiled-in layout tables for the supported interchange formats
//!
//! One table per (file kind, record-type code). Offsets are 0-based byte
//! positions within the Latin-1 line. The decoder never hardcodes offsets;
//! everything routes through these tables.

use crate::app::models::{FieldType, FileKind, RecordCategory};

use super::schema::{FieldSchema, LayoutSchema, RecordSchema};

const fn field(
    name: &'static str,
    start: usize,
    length: usize,
    field_type: FieldType,
) -> FieldSchema {
    FieldSchema {
        name,
        start,
        length,
        field_type,
        required: true,
    }
}

const fn optional(
    name: &'static str,
    start: usize,
    length: usize,
    field_type: FieldType,
) -> FieldSchema {
    FieldSchema {
        name,
        start,
        length,
        field_type,
        required: false,
    }
}

// =============================================================================
// Count Header (shared by portfolio, derivatives and reconciliation files)
// =============================================================================

const COUNT_HEADER_FIELDS: &[FieldSchema] = &[
    field("record_count", 0, 8, FieldType::Integer),
    field("layout_code", 8, 4, FieldType::Text),
    field("issuer_code", 12, 3, FieldType::Text),
    field("fund_code", 15, 6, FieldType::Text),
    field("generation_date", 21, 8, FieldType::DateYmd8),
    optional("sequence", 29, 3, FieldType::Integer),
];

const COUNT_HEADER: RecordSchema = RecordSchema {
    code: "HDR",
    category: RecordCategory::Header,
    label: "record-count header",
    min_length: 29,
    fields: COUNT_HEADER_FIELDS,
};

// =============================================================================
// Portfolio Layouts (3-digit record codes)
// =============================================================================

const PORTFOLIO_GOVERNMENT_FIELDS: &[FieldSchema] = &[
    field("isin", 3, 12, FieldType::Isin),
    field("instrument_name", 15, 40, FieldType::Text),
    field("series", 55, 10, FieldType::Text),
    field("nominal_amount", 65, 18, FieldType::Decimal { scale: 8 }),
    field("market_value", 83, 15, FieldType::Decimal { scale: 2 }),
    field("maturity_date", 98, 8, FieldType::DateYmd8),
    field("currency", 106, 3, FieldType::Currency),
    optional("yield_rate", 109, 18, FieldType::Decimal { scale: 8 }),
    optional("counterparty", 127, 40, FieldType::Text),
];

const PORTFOLIO_CORPORATE_FIELDS: &[FieldSchema] = &[
    field("isin", 3, 12, FieldType::Isin),
    field("instrument_name", 15, 40, FieldType::Text),
    field("issuer_rating", 55, 6, FieldType::Text),
    field("nominal_amount", 61, 18, FieldType::Decimal { scale: 8 }),
    field("market_value", 79, 15, FieldType::Decimal { scale: 2 }),
    field("maturity_date", 94, 8, FieldType::DateYmd8),
    field("currency", 102, 3, FieldType::Currency),
    optional("yield_rate", 105, 18, FieldType::Decimal { scale: 8 }),
];

const PORTFOLIO_EQUITY_FIELDS: &[FieldSchema] = &[
    field("isin", 3, 12, FieldType::Isin),
    field("issuer_name", 15, 40, FieldType::Text),
    field("shares", 55, 18, FieldType::Decimal { scale: 6 }),
    field("market_value", 73, 15, FieldType::Decimal { scale: 2 }),
    field("currency", 88, 3, FieldType::Currency),
    optional("market_code", 91, 4, FieldType::Text),
];

const PORTFOLIO_FUND_FIELDS: &[FieldSchema] = &[
    field("isin", 3, 12, FieldType::Isin),
    field("fund_name", 15, 40, FieldType::Text),
    field("shares", 55, 18, FieldType::Decimal { scale: 6 }),
    field("market_value", 73, 15, FieldType::Decimal { scale: 2 }),
    field("currency", 88, 3, FieldType::Currency),
];

const PORTFOLIO_SUBTOTAL_FIELDS: &[FieldSchema] = &[
    field("section_code", 3, 2, FieldType::Text),
    field("record_count", 5, 8, FieldType::Integer),
    field("total_market_value", 13, 18, FieldType::Decimal { scale: 2 }),
];

const PORTFOLIO_CONTROL_FIELDS: &[FieldSchema] = &[
    field("record_count", 3, 8, FieldType::Integer),
    field("total_market_value", 11, 18, FieldType::Decimal { scale: 2 }),
];

const PORTFOLIO_RECORDS: &[RecordSchema] = &[
    RecordSchema {
        code: "301",
        category: RecordCategory::Detail,
        label: "government instrument position",
        min_length: 109,
        fields: PORTFOLIO_GOVERNMENT_FIELDS,
    },
    RecordSchema {
        code: "302",
        category: RecordCategory::Detail,
        label: "corporate debt position",
        min_length: 105,
        fields: PORTFOLIO_CORPORATE_FIELDS,
    },
    RecordSchema {
        code: "303",
        category: RecordCategory::Detail,
        label: "equity position",
        min_length: 91,
        fields: PORTFOLIO_EQUITY_FIELDS,
    },
    RecordSchema {
        code: "304",
        category: RecordCategory::Detail,
        label: "fund share position",
        min_length: 91,
        fields: PORTFOLIO_FUND_FIELDS,
    },
    RecordSchema {
        code: "398",
        category: RecordCategory::Footer,
        label: "section subtotal",
        min_length: 31,
        fields: PORTFOLIO_SUBTOTAL_FIELDS,
    },
    RecordSchema {
        code: "399",
        category: RecordCategory::Footer,
        label: "control total",
        min_length: 29,
        fields: PORTFOLIO_CONTROL_FIELDS,
    },
];

// =============================================================================
// Derivatives Layouts (4-digit record codes)
// =============================================================================

const DERIVATIVES_SWAP_FIELDS: &[FieldSchema] = &[
    field("lei", 4, 20, FieldType::Lei),
    field("counterparty_name", 24, 40, FieldType::Text),
    field("pay_currency", 64, 3, FieldType::Currency),
    field("receive_currency", 67, 3, FieldType::Currency),
    field("notional", 70, 18, FieldType::Decimal { scale: 2 }),
    field("fixing_date", 88, 8, FieldType::DateYmd8),
    field("maturity_date", 96, 8, FieldType::DateYmd8),
    optional("market_value", 104, 18, FieldType::Decimal { scale: 2 }),
];

const DERIVATIVES_FUTURE_FIELDS: &[FieldSchema] = &[
    field("contract_code", 4, 12, FieldType::Text),
    field("underlying", 16, 30, FieldType::Text),
    field("currency", 46, 3, FieldType::Currency),
    field("contracts", 49, 8, FieldType::Integer),
    field("notional", 57, 18, FieldType::Decimal { scale: 2 }),
    field("maturity_date", 75, 8, FieldType::DateYmd8),
];

const DERIVATIVES_OPTION_FIELDS: &[FieldSchema] = &[
    field("contract_code", 4, 12, FieldType::Text),
    field("underlying", 16, 30, FieldType::Text),
    field("currency", 46, 3, FieldType::Currency),
    field("option_type", 49, 1, FieldType::Text),
    field("strike", 50, 18, FieldType::Decimal { scale: 6 }),
    field("notional", 68, 18, FieldType::Decimal { scale: 2 }),
    field("maturity_date", 86, 8, FieldType::DateYmd8),
];

const DERIVATIVES_TOTAL_FIELDS: &[FieldSchema] = &[
    field("record_count", 4, 8, FieldType::Integer),
    field("total_notional", 12, 18, FieldType::Decimal { scale: 2 }),
];

const DERIVATIVES_RECORDS: &[RecordSchema] = &[
    RecordSchema {
        code: "2001",
        category: RecordCategory::Detail,
        label: "swap position",
        min_length: 104,
        fields: DERIVATIVES_SWAP_FIELDS,
    },
    RecordSchema {
        code: "2002",
        category: RecordCategory::Detail,
        label: "futures position",
        min_length: 83,
        fields: DERIVATIVES_FUTURE_FIELDS,
    },
    RecordSchema {
        code: "2003",
        category: RecordCategory::Detail,
        label: "option position",
        min_length: 94,
        fields: DERIVATIVES_OPTION_FIELDS,
    },
    RecordSchema {
        code: "9998",
        category: RecordCategory::Footer,
        label: "section subtotal",
        min_length: 30,
        fields: DERIVATIVES_TOTAL_FIELDS,
    },
    RecordSchema {
        code: "9999",
        category: RecordCategory::Footer,
        label: "control total",
        min_length: 30,
        fields: DERIVATIVES_TOTAL_FIELDS,
    },
];

// =============================================================================
// Reconciliation Layouts (5-digit record codes)
// =============================================================================

const RECONCILIATION_BALANCE_FIELDS: &[FieldSchema] = &[
    field("account_number", 5, 11, FieldType::Text),
    field("subaccount_code", 16, 4, FieldType::Text),
    field("balance", 20, 18, FieldType::Decimal { scale: 2 }),
    field("movement_date", 38, 8, FieldType::DateYmd8),
    field("currency", 46, 3, FieldType::Currency),
];

const RECONCILIATION_TOTAL_FIELDS: &[FieldSchema] = &[
    field("record_count", 5, 8, FieldType::Integer),
    field("total_balance", 13, 18, FieldType::Decimal { scale: 2 }),
];

const RECONCILIATION_RECORDS: &[RecordSchema] = &[
    RecordSchema {
        code: "11011",
        category: RecordCategory::Detail,
        label: "account balance",
        min_length: 49,
        fields: RECONCILIATION_BALANCE_FIELDS,
    },
    RecordSchema {
        code: "11098",
        category: RecordCategory::Footer,
        label: "section subtotal",
        min_length: 31,
        fields: RECONCILIATION_TOTAL_FIELDS,
    },
    RecordSchema {
        code: "11099",
        category: RecordCategory::Footer,
        label: "control total",
        min_length: 31,
        fields: RECONCILIATION_TOTAL_FIELDS,
    },
];

// =============================================================================
// Generic Marker Layouts (2-digit record codes)
// =============================================================================

const MARKER_HEADER_FIELDS: &[FieldSchema] = &[
    field("layout_code", 2, 4, FieldType::Text),
    field("issuer_code", 6, 3, FieldType::Text),
    field("fund_code", 9, 6, FieldType::Text),
    field("generation_date", 15, 8, FieldType::DateYmd8),
    optional("record_count", 23, 8, FieldType::Integer),
];

const MARKER_HEADER: RecordSchema = RecordSchema {
    code: "01",
    category: RecordCategory::Header,
    label: "file header",
    min_length: 23,
    fields: MARKER_HEADER_FIELDS,
};

const MARKER_FOOTER_FIELDS: &[FieldSchema] = &[
    field("record_count", 2, 8, FieldType::Integer),
    optional("total_amount", 10, 18, FieldType::Decimal { scale: 2 }),
];

const MARKER_FOOTER: RecordSchema = RecordSchema {
    code: "03",
    category: RecordCategory::Footer,
    label: "file footer",
    min_length: 10,
    fields: MARKER_FOOTER_FIELDS,
};

const MARKER_ALT_FOOTER: RecordSchema = RecordSchema {
    code: "99",
    category: RecordCategory::Footer,
    label: "file footer",
    min_length: 10,
    fields: MARKER_FOOTER_FIELDS,
};

const MARKER_CONTROL_FIELDS: &[FieldSchema] = &[
    field("control_code", 2, 4, FieldType::Text),
    field("control_total", 6, 18, FieldType::Decimal { scale: 2 }),
];

const MARKER_CONTROL: RecordSchema = RecordSchema {
    code: "04",
    category: RecordCategory::Control,
    label: "control record",
    min_length: 24,
    fields: MARKER_CONTROL_FIELDS,
};

const WITHDRAWAL_DETAIL_FIELDS: &[FieldSchema] = &[
    field("nss", 2, 11, FieldType::Text),
    field("curp", 13, 18, FieldType::Text),
    field("rfc", 31, 13, FieldType::Text),
    field("disposition_type", 44, 2, FieldType::Text),
    field("request_date", 46, 8, FieldType::DateYmd8),
    field("amount", 54, 18, FieldType::Decimal { scale: 2 }),
    field("tax_withheld", 72, 18, FieldType::Decimal { scale: 2 }),
    optional("payment_date", 90, 6, FieldType::DateYmd6),
];

const TRANSFER_DETAIL_FIELDS: &[FieldSchema] = &[
    field("nss", 2, 11, FieldType::Text),
    field("curp", 13, 18, FieldType::Text),
    field("ceding_issuer", 31, 3, FieldType::Text),
    field("receiving_issuer", 34, 3, FieldType::Text),
    field("transfer_date", 37, 8, FieldType::DateYmd8),
    field("amount", 45, 18, FieldType::Decimal { scale: 2 }),
    optional("request_id", 63, 10, FieldType::Text),
];

const CONTRIBUTION_DETAIL_FIELDS: &[FieldSchema] = &[
    field("nss", 2, 11, FieldType::Text),
    field("curp", 13, 18, FieldType::Text),
    field("subaccount_code", 31, 4, FieldType::Text),
    field("contribution_date", 35, 8, FieldType::DateYmd8),
    field("amount", 43, 18, FieldType::Decimal { scale: 2 }),
    optional("employer_rfc", 61, 13, FieldType::Text),
];

const PAYROLL_DETAIL_FIELDS: &[FieldSchema] = &[
    field("nss", 2, 11, FieldType::Text),
    field("rfc", 13, 13, FieldType::Text),
    field("pay_period_start", 26, 8, FieldType::DateYmd8),
    field("pay_period_end", 34, 8, FieldType::DateYmd8),
    field("base_salary", 42, 15, FieldType::Decimal { scale: 2 }),
    field("contribution_amount", 57, 18, FieldType::Decimal { scale: 2 }),
];

const ACCOUNTING_DETAIL_FIELDS: &[FieldSchema] = &[
    field("ledger_account", 2, 12, FieldType::Text),
    field("movement_date", 14, 8, FieldType::DateYmd8),
    field("debit", 22, 18, FieldType::Decimal { scale: 2 }),
    field("credit", 40, 18, FieldType::Decimal { scale: 2 }),
    optional("reference", 58, 20, FieldType::Text),
];

const CORRECTION_DETAIL_FIELDS: &[FieldSchema] = &[
    field("original_reference", 2, 20, FieldType::Text),
    field("nss", 22, 11, FieldType::Text),
    field("correction_date", 33, 8, FieldType::DateYmd8),
    field("original_amount", 41, 18, FieldType::Decimal { scale: 2 }),
    field("corrected_amount", 59, 18, FieldType::Decimal { scale: 2 }),
];

const fn marker_records(
    detail_label: &'static str,
    detail_min: usize,
    detail_fields: &'static [FieldSchema],
) -> [RecordSchema; 5] {
    [
        MARKER_HEADER,
        RecordSchema {
            code: "02",
            category: RecordCategory::Detail,
            label: detail_label,
            min_length: detail_min,
            fields: detail_fields,
        },
        MARKER_FOOTER,
        MARKER_CONTROL,
        MARKER_ALT_FOOTER,
    ]
}

const WITHDRAWAL_RECORDS: [RecordSchema; 5] =
    marker_records("withdrawal movement", 90, WITHDRAWAL_DETAIL_FIELDS);
const TRANSFER_RECORDS: [RecordSchema; 5] =
    marker_records("transfer movement", 63, TRANSFER_DETAIL_FIELDS);
const CONTRIBUTION_RECORDS: [RecordSchema; 5] =
    marker_records("voluntary contribution", 61, CONTRIBUTION_DETAIL_FIELDS);
const PAYROLL_RECORDS: [RecordSchema; 5] =
    marker_records("payroll movement", 75, PAYROLL_DETAIL_FIELDS);
const ACCOUNTING_RECORDS: [RecordSchema; 5] =
    marker_records("ledger movement", 58, ACCOUNTING_DETAIL_FIELDS);
const CORRECTION_RECORDS: [RecordSchema; 5] =
    marker_records("movement correction", 77, CORRECTION_DETAIL_FIELDS);

// =============================================================================
// Layout Registry
// =============================================================================

/// Every compiled-in layout, across all versions
pub const ALL_LAYOUTS: &[LayoutSchema] = &[
    LayoutSchema {
        kind: FileKind::Portfolio,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: Some((2021, 12, 31)),
        header: Some(&COUNT_HEADER),
        records: PORTFOLIO_RECORDS,
    },
    // Revision 1.1 widened the optional trailing fields; positions of the
    // required fields are unchanged, so the tables are shared.
    LayoutSchema {
        kind: FileKind::Portfolio,
        version: "1.1",
        effective_from: Some((2022, 1, 1)),
        effective_to: None,
        header: Some(&COUNT_HEADER),
        records: PORTFOLIO_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Derivatives,
        version: "1.0",
        effective_from: Some((2018, 7, 1)),
        effective_to: None,
        header: Some(&COUNT_HEADER),
        records: DERIVATIVES_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Reconciliation,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: Some(&COUNT_HEADER),
        records: RECONCILIATION_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Withdrawal,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &WITHDRAWAL_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Transfer,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &TRANSFER_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Contribution,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &CONTRIBUTION_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Payroll,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &PAYROLL_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Accounting,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &ACCOUNTING_RECORDS,
    },
    LayoutSchema {
        kind: FileKind::Correction,
        version: "1.0",
        effective_from: Some((2016, 1, 1)),
        effective_to: None,
        header: None,
        records: &CORRECTION_RECORDS,
    },
];
