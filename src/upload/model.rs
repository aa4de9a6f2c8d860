//! Target descriptor for an attachment upload

/// Identifies the business record an attachment is attached to.
///
/// `inter_id` and `bill_no` both locate the record; the service accepts
/// either (or both), so whichever the caller has on hand may be left
/// empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadModel {
    /// Form id of the target record's form (e.g. `SAL_ORDER`)
    pub form_id: String,
    /// Internal id of the target record
    pub inter_id: String,
    /// Bill number of the target record
    pub bill_no: String,
    /// File name shown in the attachment list
    pub alias_file_name: String,
}

impl UploadModel {
    /// Create a descriptor with all four fields
    pub fn new(
        form_id: impl Into<String>,
        inter_id: impl Into<String>,
        bill_no: impl Into<String>,
        alias_file_name: impl Into<String>,
    ) -> Self {
        Self {
            form_id: form_id.into(),
            inter_id: inter_id.into(),
            bill_no: bill_no.into(),
            alias_file_name: alias_file_name.into(),
        }
    }
}
