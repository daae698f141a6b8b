//! Request body state.
//!
//! A request either has no body, a single raw body, or an accumulated set of
//! form fields. [`BodyMode`] holds exactly one of these, and the transitions
//! between them are checked by [`Request`](crate::Request) before any state
//! is touched.

use std::io::Read;

use url::form_urlencoded;

use crate::multipart;

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
pub(crate) const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Binary content of a form field, with optional metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    filename: Option<String>,
    content_type: Option<String>,
    data: Vec<u8>,
}

impl FilePart {
    /// Create a part from raw bytes.
    #[must_use]
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: None,
            content_type: None,
            data: data.into(),
        }
    }

    /// Read `reader` to the end and keep its content.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if it fails.
    pub fn from_reader(mut reader: impl Read) -> std::io::Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Ok(Self::new(data))
    }

    /// Attach/override the filename metadata.
    #[must_use]
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Attach/override the content type metadata.
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Filename sent in the part's `Content-Disposition`.
    #[must_use]
    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    /// Content type sent for the part.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The part's bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Value of a form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A plain text value.
    Text(String),
    /// A file-like value.
    Binary(FilePart),
}

impl FieldValue {
    /// Read `reader` to the end into a binary value.
    ///
    /// # Errors
    ///
    /// Returns the reader's error if it fails.
    pub fn from_reader(reader: impl Read) -> std::io::Result<Self> {
        FilePart::from_reader(reader).map(Self::Binary)
    }

    const fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(FilePart::new(value))
    }
}

impl From<FilePart> for FieldValue {
    fn from(value: FilePart) -> Self {
        Self::Binary(value)
    }
}

/// A single form field. Only stream fields may be unnamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: Option<String>,
    value: FieldValue,
}

impl Field {
    pub(crate) fn named(name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            name: Some(name.into()),
            value: value.into(),
        }
    }

    pub(crate) const fn unnamed(part: FilePart) -> Self {
        Self {
            name: None,
            value: FieldValue::Binary(part),
        }
    }

    /// The field name, `None` for an unnamed stream field.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The field value.
    #[must_use]
    pub const fn value(&self) -> &FieldValue {
        &self.value
    }
}

/// A single opaque payload.
#[derive(Debug, Clone)]
pub(crate) struct RawBody {
    bytes: Vec<u8>,
    content_type: &'static str,
}

impl RawBody {
    pub(crate) fn text(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
            content_type: TEXT_PLAIN,
        }
    }

    pub(crate) const fn json(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            content_type: APPLICATION_JSON,
        }
    }
}

/// Accumulated form fields and the payload encoded from them.
#[derive(Debug, Clone)]
pub(crate) struct FieldSet {
    fields: Vec<Field>,
    boundary: String,
    payload: Vec<u8>,
    content_type: String,
}

impl FieldSet {
    fn new() -> Self {
        Self {
            fields: Vec::new(),
            boundary: multipart::boundary(),
            payload: Vec::new(),
            content_type: FORM_URLENCODED.to_owned(),
        }
    }

    /// Merge `fields` and re-encode. A named field replaces an earlier one
    /// with the same name in place.
    fn merge(&mut self, fields: impl IntoIterator<Item = Field>) {
        for field in fields {
            let existing = field
                .name
                .as_deref()
                .and_then(|name| self.fields.iter().position(|f| f.name() == Some(name)));
            match existing {
                Some(index) => self.fields[index] = field,
                None => self.fields.push(field),
            }
        }
        self.encode();
    }

    fn encode(&mut self) {
        let url_encodable = self
            .fields
            .iter()
            .all(|field| field.name.is_some() && field.value.is_text());

        if url_encodable {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for field in &self.fields {
                if let (Some(name), FieldValue::Text(text)) = (&field.name, &field.value) {
                    serializer.append_pair(name, text);
                }
            }
            self.payload = serializer.finish().into_bytes();
            FORM_URLENCODED.clone_into(&mut self.content_type);
        } else {
            self.payload = multipart::encode(&self.boundary, &self.fields);
            self.content_type = multipart::content_type(&self.boundary);
        }
    }
}

/// The body state of a request.
#[derive(Debug, Clone, Default)]
pub(crate) enum BodyMode {
    /// No body. The only state a `GET` can be in.
    #[default]
    Empty,
    /// A raw body; sealed against fields.
    Raw(RawBody),
    /// Form fields; sealed against raw bodies.
    Fields(FieldSet),
}

impl BodyMode {
    pub(crate) const fn has_raw_body(&self) -> bool {
        matches!(self, Self::Raw(_))
    }

    pub(crate) const fn has_fields(&self) -> bool {
        matches!(self, Self::Fields(_))
    }

    /// Add fields. The caller has already rejected the `Raw` state.
    pub(crate) fn add_fields(&mut self, fields: impl IntoIterator<Item = Field>) {
        debug_assert!(!self.has_raw_body());
        if !self.has_fields() {
            *self = Self::Fields(FieldSet::new());
        }
        if let Self::Fields(set) = self {
            set.merge(fields);
        }
    }

    /// Replace the raw body. The caller has already rejected the `Fields` state.
    pub(crate) fn set_raw(&mut self, body: RawBody) {
        debug_assert!(!self.has_fields());
        *self = Self::Raw(body);
    }

    /// Encoded payload, `None` when there is no body.
    pub(crate) fn payload(&self) -> Option<&[u8]> {
        match self {
            Self::Empty => None,
            Self::Raw(raw) => Some(&raw.bytes),
            Self::Fields(set) => Some(&set.payload),
        }
    }

    pub(crate) fn content_type(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Raw(raw) => Some(raw.content_type),
            Self::Fields(set) => Some(&set.content_type),
        }
    }

    pub(crate) fn fields(&self) -> &[Field] {
        match self {
            Self::Fields(set) => &set.fields,
            _ => &[],
        }
    }
}
