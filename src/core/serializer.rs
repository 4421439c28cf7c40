use crate::domain::model::NormalizedNote;
use crate::utils::error::{ConvertError, Result};
use encoding_rs::Encoding;

const EXPORT_DOCTYPE: &str =
    r#"<!DOCTYPE en-export SYSTEM "http://xml.evernote.com/pub/evernote-export3.dtd">"#;
const NOTE_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE en-note SYSTEM "http://xml.evernote.com/pub/enml2.dtd">"#;
const NOTE_STYLE: &str =
    "word-wrap: break-word; -webkit-nbsp-mode: space; -webkit-line-break: after-white-space;";

/// Renders one note as an Evernote export document.
///
/// The body goes into CDATA as is; the normalizer has already replaced line
/// breaks and ampersands in it.
pub fn render_enex(note: &NormalizedNote, encoding: &'static Encoding) -> String {
    let tags: String = note
        .labels
        .iter()
        .map(|label| format!("    <tag>{}</tag>\n", escape_text(&label.replace('&', "&amp;"))))
        .collect();

    let mut xml = format!(
        r#"<?xml version="1.0" encoding="{}"?>"#,
        encoding.output_encoding().name()
    );
    xml.push('\n');
    xml.push_str(EXPORT_DOCTYPE);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<en-export application="Evernote" version="Evernote">
  <note>
    <title>{title}</title>
    <content>
      <![CDATA[{header}
<en-note style="{style}">
{text}
</en-note>
]]>
    </content>
{tags}  </note>
</en-export>
"#,
        title = escape_text(&note.title),
        header = NOTE_HEADER,
        style = NOTE_STYLE,
        text = escape_cdata(&note.text),
        tags = tags,
    ));

    xml
}

/// Encodes the rendered document, refusing characters the encoding lacks.
pub fn encode_document(xml: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let (bytes, used, had_errors) = encoding.encode(xml);
    if had_errors {
        return Err(ConvertError::Unencodable {
            encoding: used.name().to_string(),
        });
    }
    Ok(bytes.into_owned())
}

fn escape_text(text: &str) -> String {
    text.replace('<', "&lt;").replace('>', "&gt;")
}

/// `]]>` would close the section early; split it across two sections.
fn escape_cdata(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}
