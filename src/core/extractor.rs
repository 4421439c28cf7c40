use crate::config::toml_config::{Marker, MarkerConfig};
use crate::domain::model::{Note, ARCHIVE_LABEL};
use crate::utils::error::{ConvertError, Result};
use scraper::{ElementRef, Html, Selector};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub note: Note,
    /// Title or content marker missing from the document.
    pub incomplete: bool,
}

struct CompiledMarker {
    selector: Selector,
    attribute: String,
    value: String,
}

impl CompiledMarker {
    fn compile(field: &str, marker: &Marker) -> Result<Self> {
        let selector =
            Selector::parse(&marker.tag).map_err(|e| ConvertError::InvalidConfigValueError {
                field: format!("markers.{}.tag", field),
                value: marker.tag.clone(),
                reason: format!("{:?}", e),
            })?;

        Ok(Self {
            selector,
            attribute: marker.attribute.clone(),
            value: marker.value.clone(),
        })
    }

    fn matches<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        document
            .select(&self.selector)
            .filter(move |el| el.value().attr(&self.attribute) == Some(self.value.as_str()))
    }

    /// Direct text children of every matching element, in document order.
    fn texts(&self, document: &Html) -> Option<Vec<String>> {
        let mut found = false;
        let mut texts = Vec::new();
        for element in self.matches(document) {
            found = true;
            texts.extend(
                element
                    .children()
                    .filter_map(|child| child.value().as_text().map(|t| String::from(&**t))),
            );
        }
        found.then_some(texts)
    }
}

/// Reads [`Note`]s out of Keep HTML exports.
pub struct NoteExtractor {
    title: CompiledMarker,
    content: CompiledMarker,
    label: CompiledMarker,
    archived: CompiledMarker,
}

impl NoteExtractor {
    pub fn new(markers: &MarkerConfig) -> Result<Self> {
        Ok(Self {
            title: CompiledMarker::compile("title", &markers.title)?,
            content: CompiledMarker::compile("content", &markers.content)?,
            label: CompiledMarker::compile("label", &markers.label)?,
            archived: CompiledMarker::compile("archived", &markers.archived)?,
        })
    }

    /// The parser recovers from malformed markup, so this never fails.
    pub fn extract(&self, html: &str) -> Extraction {
        let document = Html::parse_document(html);

        let title = self.title.texts(&document);
        let content = self.content.texts(&document);
        let incomplete = title.is_none() || content.is_none();

        let archived = self.archived.matches(&document).next().is_some();
        let mut labels = self.label.texts(&document).unwrap_or_default();
        if archived {
            labels.push(ARCHIVE_LABEL.to_string());
        }

        Extraction {
            note: Note {
                title: title.unwrap_or_default(),
                text: content.unwrap_or_default().join("\n"),
                labels,
                archived,
            },
            incomplete,
        }
    }
}
