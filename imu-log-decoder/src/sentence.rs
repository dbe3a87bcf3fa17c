//! Sentence tokenization
//!
//! Splits a validated sentence body into trimmed comma-separated fields and resolves
//! the type tag. Field semantics are left to the packet decoders.

use crate::checksum::ValidatedSentence;
use crate::types::{PacketError, SentenceKind};

/// A tokenized sentence; field 0 is the type tag
#[derive(Debug, Clone, PartialEq)]
pub struct Sentence<'a> {
    kind: SentenceKind,
    fields: Vec<&'a str>,
}

impl<'a> Sentence<'a> {
    pub fn tokenize(sentence: ValidatedSentence<'a>) -> Self {
        let fields: Vec<&'a str> = sentence.body().split(',').map(str::trim).collect();
        let kind = SentenceKind::from_tag(fields.first().copied().unwrap_or_default());
        Self { kind, fields }
    }

    pub fn kind(&self) -> &SentenceKind {
        &self.kind
    }

    pub fn tag(&self) -> &'a str {
        self.fields.first().copied().unwrap_or_default()
    }

    /// Raw text of field `index`
    pub fn field(&self, index: usize) -> Option<&'a str> {
        self.fields.get(index).copied()
    }

    /// Number of fields after the tag
    pub fn data_field_count(&self) -> usize {
        self.fields.len().saturating_sub(1)
    }

    /// Fail with `InsufficientFields` unless at least `required` data fields are present
    pub fn require(&self, required: usize) -> Result<(), PacketError> {
        let found = self.data_field_count();
        if found < required {
            return Err(PacketError::InsufficientFields {
                kind: self.kind.clone(),
                found,
                required,
            });
        }
        Ok(())
    }

    /// Parse field `index` as a finite floating point number
    ///
    /// `NaN` and the infinities parse as `f64` but are rejected like any other junk.
    pub fn number(&self, index: usize) -> Result<f64, PacketError> {
        let text = self.require_field(index)?;
        match text.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(PacketError::InvalidField {
                index,
                value: text.to_string(),
            }),
        }
    }

    /// Parse field `index` as an integer
    pub fn integer(&self, index: usize) -> Result<i64, PacketError> {
        let text = self.require_field(index)?;
        text.parse::<i64>().map_err(|_| PacketError::InvalidField {
            index,
            value: text.to_string(),
        })
    }

    /// The native timestamp of this sentence, whatever its kind
    pub fn raw_time(&self) -> Result<f64, PacketError> {
        self.number(self.kind.time_field())
    }

    fn require_field(&self, index: usize) -> Result<&'a str, PacketError> {
        self.field(index).ok_or_else(|| PacketError::InsufficientFields {
            kind: self.kind.clone(),
            found: self.data_field_count(),
            required: index,
        })
    }
}
