use serde::Serialize;

use super::vocabulary::ColumnRole;
use super::ParseError;

/// Column positions located from header rows.
///
/// A role stays `None` until a header naming it is seen. Later header rows
/// overwrite earlier assignments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnRoles {
    pub sample_type: Option<usize>,
    pub peak_name: Option<usize>,
    pub retention_time: Option<usize>,
    pub area: Option<usize>,
    pub sample_name: Option<usize>,
    pub weight: Option<usize>,
    pub dilution: Option<usize>,
}

impl ColumnRoles {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, role: ColumnRole) -> &mut Option<usize> {
        match role {
            ColumnRole::SampleType => &mut self.sample_type,
            ColumnRole::PeakName => &mut self.peak_name,
            ColumnRole::RetentionTime => &mut self.retention_time,
            ColumnRole::Area => &mut self.area,
            ColumnRole::SampleName => &mut self.sample_name,
            ColumnRole::Weight => &mut self.weight,
            ColumnRole::Dilution => &mut self.dilution,
        }
    }

    /// Assign a column index to a role
    pub fn assign(&mut self, role: ColumnRole, index: usize) {
        *self.slot_mut(role) = Some(index);
    }

    /// Column index for a role, if one has been located
    pub fn get(&self, role: ColumnRole) -> Option<usize> {
        match role {
            ColumnRole::SampleType => self.sample_type,
            ColumnRole::PeakName => self.peak_name,
            ColumnRole::RetentionTime => self.retention_time,
            ColumnRole::Area => self.area,
            ColumnRole::SampleName => self.sample_name,
            ColumnRole::Weight => self.weight,
            ColumnRole::Dilution => self.dilution,
        }
    }

    /// Whether the export carries a weight column
    pub fn has_weight(&self) -> bool {
        self.weight.is_some()
    }

    /// Whether the export carries a dilution column
    pub fn has_dilution(&self) -> bool {
        self.dilution.is_some()
    }

    /// Read the field for `role` from a data row.
    ///
    /// Fails when the role was never located or the row is too short to
    /// contain it.
    pub fn field<'a>(
        &self,
        role: ColumnRole,
        fields: &[&'a str],
        line: usize,
    ) -> Result<&'a str, ParseError> {
        let index = self
            .get(role)
            .ok_or(ParseError::MissingColumn { line, role })?;
        fields.get(index).copied().ok_or(ParseError::ShortRow {
            line,
            role,
            index,
            width: fields.len(),
        })
    }
}
