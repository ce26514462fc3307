use scraper::{ElementRef, Html, Selector};

use crate::{CompressionChoice, FormPage};

const CSRF_META: &str = r#"meta[name="csrf-token"]"#;
const COMPRESSION_INPUTS: &str = r#"input[name="compression"]"#;
const LABELS: &str = "label[for]";

/// Pulls the CSRF token and the compression radios out of the index page.
///
/// Radios are returned in document order. A radio's label is the text of the
/// `<label for=...>` pointing at its id, falling back to its value.
pub fn parse_form_page(html: &str) -> FormPage {
    let doc = Html::parse_document(html);
    let csrf_sel = Selector::parse(CSRF_META).ok();
    let input_sel = Selector::parse(COMPRESSION_INPUTS).ok();
    let label_sel = Selector::parse(LABELS).ok();

    let csrf_token = csrf_sel
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .and_then(|meta| meta.value().attr("content"))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty());

    let labels: Vec<ElementRef> = label_sel
        .as_ref()
        .map(|sel| doc.select(sel).collect())
        .unwrap_or_default();

    let choices = input_sel
        .as_ref()
        .map(|sel| {
            doc.select(sel)
                .filter(|input| is_radio(input))
                .filter_map(|input| {
                    let value = input.value().attr("value")?.to_string();
                    let label = input
                        .value()
                        .id()
                        .and_then(|id| label_text(&labels, id))
                        .unwrap_or_else(|| value.clone());
                    Some(CompressionChoice {
                        checked: input.value().attr("checked").is_some(),
                        value,
                        label,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    FormPage {
        csrf_token,
        choices,
    }
}

fn is_radio(input: &ElementRef) -> bool {
    input
        .value()
        .attr("type")
        .is_some_and(|kind| kind.eq_ignore_ascii_case("radio"))
}

fn label_text(labels: &[ElementRef], id: &str) -> Option<String> {
    labels
        .iter()
        .find(|label| label.value().attr("for") == Some(id))
        .map(|label| {
            label
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
}
