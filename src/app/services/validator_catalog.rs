//! Semantic rule metadata per file kind
//!
//! The parsing core does not run semantic validation itself; it exposes, for
//! each file kind, the ordered list of rule identifiers a downstream rule
//! engine is expected to run. The catalog is a plain value passed to whatever
//! consumes it, so tests and alternate deployments can swap in their own rule
//! sets without touching process-wide state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::app::models::FileKind;

/// Identity of one semantic validation rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleDescriptor {
    /// Stable machine-readable rule code
    pub code: &'static str,
    /// Human-readable name for reports
    pub display_name: &'static str,
    /// Rule family, used to group findings in reports
    pub group: &'static str,
    /// Execution order within the kind's rule set
    pub order: u32,
    /// Whether a failure of this rule rejects the file outright
    pub required: bool,
}

const fn rule(
    code: &'static str,
    display_name: &'static str,
    group: &'static str,
    order: u32,
    required: bool,
) -> RuleDescriptor {
    RuleDescriptor {
        code,
        display_name,
        group,
        order,
        required,
    }
}

/// Ordered semantic rule sets keyed by file kind
#[derive(Debug, Clone, Default)]
pub struct ValidatorCatalog {
    rules: BTreeMap<FileKind, Vec<RuleDescriptor>>,
}

impl ValidatorCatalog {
    /// The built-in rule sets for every supported file kind
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        for (kind, rules) in BUILTIN_RULES {
            catalog.set_rules(*kind, rules.to_vec());
        }
        catalog
    }

    /// Replace the rule set for one kind, keeping the rest
    pub fn with_rules(mut self, kind: FileKind, rules: Vec<RuleDescriptor>) -> Self {
        self.set_rules(kind, rules);
        self
    }

    fn set_rules(&mut self, kind: FileKind, mut rules: Vec<RuleDescriptor>) {
        rules.sort_by_key(|r| r.order);
        self.rules.insert(kind, rules);
    }

    /// The ordered rule set for a kind; empty for kinds with no rules
    pub fn rules_for(&self, kind: FileKind) -> &[RuleDescriptor] {
        self.rules.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kinds with at least one registered rule
    pub fn kinds(&self) -> impl Iterator<Item = FileKind> + '_ {
        self.rules
            .iter()
            .filter(|(_, rules)| !rules.is_empty())
            .map(|(kind, _)| *kind)
    }
}

// ============================================================================
// Built-in rule sets
// ============================================================================

const BUILTIN_RULES: &[(FileKind, &[RuleDescriptor])] = &[
    (
        FileKind::Payroll,
        &[
            rule("NSS_FORMAT", "Worker NSS is 11 digits", "identity", 10, true),
            rule("CURP_FORMAT", "Worker CURP is well formed", "identity", 20, true),
            rule("RFC_FORMAT", "Worker RFC is well formed", "identity", 30, false),
            rule("PERIOD_RANGE", "Pay period falls inside the file date window", "dates", 40, true),
            rule("AMOUNT_NONNEGATIVE", "Contribution amounts are non-negative", "amounts", 50, true),
        ],
    ),
    (
        FileKind::Accounting,
        &[
            rule("ACCOUNT_EXISTS", "Account code is in the chart of accounts", "identity", 10, true),
            rule("DEBIT_CREDIT_BALANCE", "Debits equal credits per entry", "amounts", 20, true),
            rule("POSTING_DATE_RANGE", "Posting date falls in the reported period", "dates", 30, true),
            rule("CURRENCY_SUPPORTED", "Currency code is supported", "reference", 40, false),
        ],
    ),
    (
        FileKind::Correction,
        &[
            rule("ORIGINAL_REFERENCE", "Corrected record references an original", "identity", 10, true),
            rule("CORRECTION_REASON", "Correction reason code is catalogued", "reference", 20, true),
            rule("AMOUNT_DELTA_BOUNDS", "Correction delta stays inside tolerance", "amounts", 30, false),
            rule("CORRECTION_WINDOW", "Correction filed inside the allowed window", "dates", 40, true),
        ],
    ),
    (
        FileKind::Withdrawal,
        &[
            rule("NSS_FORMAT", "Worker NSS is 11 digits", "identity", 10, true),
            rule("CURP_FORMAT", "Worker CURP is well formed", "identity", 20, true),
            rule("DISPOSITION_CODE", "Disposition type is catalogued", "reference", 30, true),
            rule("TAX_WITHHELD_BOUNDS", "Tax withheld does not exceed the gross amount", "amounts", 40, true),
            rule("PAYMENT_AFTER_REQUEST", "Payment date is not before the request date", "dates", 50, false),
        ],
    ),
    (
        FileKind::Transfer,
        &[
            rule("NSS_FORMAT", "Worker NSS is 11 digits", "identity", 10, true),
            rule("ISSUER_DISTINCT", "Ceding and receiving issuers differ", "identity", 20, true),
            rule("BALANCE_NONNEGATIVE", "Transferred balance is non-negative", "amounts", 30, true),
            rule("TRANSFER_WINDOW", "Transfer date falls inside the settlement window", "dates", 40, false),
        ],
    ),
    (
        FileKind::Contribution,
        &[
            rule("NSS_FORMAT", "Worker NSS is 11 digits", "identity", 10, true),
            rule("SUBACCOUNT_CODE", "Subaccount code is catalogued", "reference", 20, true),
            rule("AMOUNT_POSITIVE", "Voluntary contribution amount is positive", "amounts", 30, true),
            rule("DEPOSIT_DATE_RANGE", "Deposit date falls in the reported period", "dates", 40, false),
        ],
    ),
    (
        FileKind::Portfolio,
        &[
            rule("ISIN_CHECKSUM", "ISIN passes its check digit", "identity", 10, true),
            rule("CURRENCY_SUPPORTED", "Currency code is supported", "reference", 20, true),
            rule("MARKET_VALUE_POSITIVE", "Market value is positive", "amounts", 30, true),
            rule("MATURITY_NOT_PAST", "Maturity date is not before the position date", "dates", 40, false),
            rule("CONTROL_TOTALS_MATCH", "Control totals match the summed details", "totals", 50, true),
        ],
    ),
    (
        FileKind::Derivatives,
        &[
            rule("LEI_CHECKSUM", "Counterparty LEI passes its check digits", "identity", 10, true),
            rule("CURRENCY_SUPPORTED", "Both legs carry supported currencies", "reference", 20, true),
            rule("NOTIONAL_POSITIVE", "Notional amount is positive", "amounts", 30, true),
            rule("MATURITY_AFTER_FIXING", "Maturity date follows the fixing date", "dates", 40, true),
        ],
    ),
    (
        FileKind::Reconciliation,
        &[
            rule("ACCOUNT_FORMAT", "Account number is well formed", "identity", 10, true),
            rule("SUBACCOUNT_CODE", "Subaccount code is catalogued", "reference", 20, true),
            rule("BALANCE_MOVEMENT_CONSISTENT", "Balances reconcile with reported movements", "totals", 30, true),
            rule("MOVEMENT_DATE_RANGE", "Movement date falls in the reported period", "dates", 40, false),
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_concrete_kind() {
        let catalog = ValidatorCatalog::builtin();
        for &kind in FileKind::all() {
            assert!(
                !catalog.rules_for(kind).is_empty(),
                "kind {} has no rules",
                kind
            );
        }
    }

    #[test]
    fn test_unknown_kind_has_no_rules() {
        let catalog = ValidatorCatalog::builtin();
        assert!(catalog.rules_for(FileKind::Unknown).is_empty());
    }

    #[test]
    fn test_rules_are_ordered_and_codes_unique_per_kind() {
        let catalog = ValidatorCatalog::builtin();
        for &kind in FileKind::all() {
            let rules = catalog.rules_for(kind);
            for pair in rules.windows(2) {
                assert!(pair[0].order < pair[1].order, "unordered rules for {}", kind);
            }
            let mut codes: Vec<_> = rules.iter().map(|r| r.code).collect();
            codes.sort_unstable();
            codes.dedup();
            assert_eq!(codes.len(), rules.len(), "duplicate rule code for {}", kind);
        }
    }

    #[test]
    fn test_with_rules_replaces_one_kind_only() {
        let replacement = vec![rule("SMOKE_ONLY", "Smoke check", "structure", 1, false)];
        let catalog = ValidatorCatalog::builtin()
            .with_rules(FileKind::Portfolio, replacement.clone());

        assert_eq!(catalog.rules_for(FileKind::Portfolio), &replacement[..]);
        assert!(!catalog.rules_for(FileKind::Withdrawal).is_empty());
    }

    #[test]
    fn test_with_rules_sorts_by_order() {
        let out_of_order = vec![
            rule("SECOND", "Second", "structure", 20, false),
            rule("FIRST", "First", "structure", 10, false),
        ];
        let catalog =
            ValidatorCatalog::default().with_rules(FileKind::Transfer, out_of_order);

        let rules = catalog.rules_for(FileKind::Transfer);
        assert_eq!(rules[0].code, "FIRST");
        assert_eq!(rules[1].code, "SECOND");
    }

    #[test]
    fn test_kinds_lists_populated_kinds() {
        let catalog = ValidatorCatalog::default()
            .with_rules(FileKind::Payroll, vec![rule("X", "X", "g", 1, false)])
            .with_rules(FileKind::Transfer, vec![]);

        let kinds: Vec<_> = catalog.kinds().collect();
        assert_eq!(kinds, vec![FileKind::Payroll]);
    }
}
