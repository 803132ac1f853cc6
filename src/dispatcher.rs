// 🔀 Record Format Dispatcher
// Routes each classified attribute of a record through the formatter

use crate::attributes::{AttributeClassification, AttributeKind};
use crate::formatter::{format_value, Direction};
use crate::record::FormattableRecord;
use tracing::debug;

/// Outcome of one pass over a record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatSummary {
    /// Attributes looked at (all set ones, or only the dirty ones)
    pub examined: usize,
    /// Attributes that had a classification and were rewritten
    pub converted: usize,
}

/// Applies the conversions declared by one classification.
///
/// Never fails: malformed values degrade to the formatter's defaults.
#[derive(Debug, Clone, Default)]
pub struct RecordFormatDispatcher {
    classification: AttributeClassification,
}

impl RecordFormatDispatcher {
    pub fn new(classification: AttributeClassification) -> Self {
        RecordFormatDispatcher { classification }
    }

    pub fn classification(&self) -> &AttributeClassification {
        &self.classification
    }

    /// Convert every set attribute to its pt-BR form (after load)
    pub fn format_toward_presentation<'r, R>(&self, record: &'r mut R) -> &'r mut R
    where
        R: FormattableRecord + ?Sized,
    {
        self.format_record(record, Direction::TowardPresentation);
        record
    }

    /// Convert changed attributes back to storage form (before save)
    pub fn format_toward_storage<'r, R>(&self, record: &'r mut R) -> &'r mut R
    where
        R: FormattableRecord + ?Sized,
    {
        self.format_record(record, Direction::TowardStorage);
        record
    }

    /// One pass in the given direction.
    ///
    /// Toward storage only dirty attributes are touched: untouched fields are
    /// already canonical and re-converting them could corrupt them.
    pub fn format_record<R>(&self, record: &mut R, direction: Direction) -> FormatSummary
    where
        R: FormattableRecord + ?Sized,
    {
        let names = match direction {
            Direction::TowardPresentation => record.attribute_names(),
            Direction::TowardStorage => record.dirty_names(),
        };

        let work: Vec<(String, AttributeKind)> = names
            .iter()
            .filter_map(|name| self.classification.kind_of(name).map(|kind| (name.clone(), kind)))
            .collect();

        let mut summary = FormatSummary {
            examined: names.len(),
            converted: 0,
        };

        for (name, kind) in work {
            // Never invent keys
            let Some(current) = record.get_attribute(&name) else {
                continue;
            };

            let formatted = format_value(kind, direction, current);
            debug!(
                attribute = %name,
                kind = kind.name(),
                direction = direction.name(),
                from = current.type_name(),
                to = formatted.type_name(),
                "formatted attribute"
            );

            record.set_attribute(&name, formatted);
            summary.converted += 1;
        }

        debug!(
            direction = direction.name(),
            examined = summary.examined,
            converted = summary.converted,
            "record formatted"
        );

        summary
    }
}

impl From<AttributeClassification> for RecordFormatDispatcher {
    fn from(classification: AttributeClassification) -> Self {
        RecordFormatDispatcher::new(classification)
    }
}

// ============================================================================
// TESTS
// ============================================================================
