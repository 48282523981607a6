//! Header/footer/detail classification of record-type codes
//!
//! Count-header families treat line 1 as the header unconditionally and take
//! footer roles from the layout catalog (the control-total codes at the top
//! of each family's numbering). Marker families classify on the two-digit
//! prefix itself.

use crate::app::models::{FileKind, RecordCategory};
use crate::app::services::layout_catalog::LayoutSchema;
use crate::constants::type_markers;

/// Classify a record-type code within its file family.
///
/// `layout` supplies the catalog's category when the code is known;
/// unrecognized codes default to detail.
pub fn classify_code(
    kind: FileKind,
    code: &str,
    line_number: u64,
    layout: Option<&LayoutSchema>,
) -> RecordCategory {
    if kind.uses_count_header() {
        if line_number == 1 {
            return RecordCategory::Header;
        }
        return layout
            .and_then(|l| l.record(code))
            .map(|r| r.category)
            .unwrap_or(RecordCategory::Detail);
    }

    match code {
        type_markers::HEADER => RecordCategory::Header,
        type_markers::DETAIL => RecordCategory::Detail,
        type_markers::FOOTER | type_markers::ALT_FOOTER => RecordCategory::Footer,
        type_markers::CONTROL => RecordCategory::Control,
        _ => RecordCategory::Detail,
    }
}
