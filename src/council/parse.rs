//! HTML extraction for the three form responses.

use html_scraper::{ElementRef, Html, Selector};

use crate::council::errors::BinDayError;
use crate::council::form::FormConfig;

/// A house-number label and the opaque server key it resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressEntry {
    pub house_number_label: String,
    pub address_key: String,
}

/// One row of the collection schedule table, date still missing its year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionScheduleRow {
    pub collection_type: String,
    pub next_collection: String,
}

/// Hidden token fields read from every page of the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageTokens {
    pub page_session_id: String,
    pub session_id: String,
    pub nonce: String,
}

fn selector(css: &str) -> Result<Selector, BinDayError> {
    Selector::parse(css).map_err(|e| BinDayError::protocol(format!("bad selector {css}: {e}")))
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Read the `value` of the `<input>` named `name`.
pub fn input_value(html: &Html, name: &str) -> Result<String, BinDayError> {
    let sel = selector(&format!(r#"input[name="{name}"]"#))?;
    html.select(&sel)
        .next()
        .map(|input| input.attr("value").unwrap_or_default().to_string())
        .ok_or_else(|| BinDayError::protocol(format!("missing field {name}")))
}

/// Extract the page-session id, session id and nonce.
pub fn page_tokens(html: &Html, form: &FormConfig) -> Result<PageTokens, BinDayError> {
    Ok(PageTokens {
        page_session_id: input_value(html, &form.field("PAGESESSIONID"))?,
        session_id: input_value(html, &form.field("SESSIONID"))?,
        nonce: input_value(html, &form.field("NONCE"))?,
    })
}

/// Extract only the fresh nonce from a submission response.
pub fn nonce(html: &Html, form: &FormConfig) -> Result<String, BinDayError> {
    input_value(html, &form.field("NONCE"))
}

/// Parse the address selector from a postcode-search response.
///
/// Option text looks like `"26, FLAT 2, HIGH STREET"`; everything before the
/// first comma is the house-number label.
pub fn addresses(html: &Html, form: &FormConfig) -> Result<Vec<AddressEntry>, BinDayError> {
    let name = form.field("ADDRESSSEARCH_ADDRESSLIST");
    let select_sel = selector(&format!(r#"select[name="{name}"]"#))?;
    let option_sel = selector("option")?;

    let select = html
        .select(&select_sel)
        .next()
        .ok_or_else(|| BinDayError::protocol(format!("missing field {name}")))?;

    let entries = select
        .select(&option_sel)
        .map(|option| {
            let text = option.text().collect::<String>();
            let label = text.split(',').next().unwrap_or_default().trim().to_string();
            AddressEntry {
                house_number_label: label,
                address_key: option.attr("value").unwrap_or_default().to_string(),
            }
        })
        .collect();

    Ok(entries)
}

/// Parse the collection schedule table from an address-pick response.
///
/// The first row holds headings. Every later row must have exactly four cells:
/// type, frequency, last collection, next collection.
pub fn schedule(html: &Html, form: &FormConfig) -> Result<Vec<CollectionScheduleRow>, BinDayError> {
    let id = &form.schedule_container_id;
    let container_sel = selector(&format!(r#"div[id="{id}"]"#))?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("td")?;

    let container = html
        .select(&container_sel)
        .next()
        .ok_or_else(|| BinDayError::protocol(format!("missing container {id}")))?;

    let mut rows = Vec::new();
    for (index, row) in container.select(&row_sel).enumerate().skip(1) {
        let cells: Vec<String> = row.select(&cell_sel).map(element_text).collect();
        let [collection_type, _frequency, _last, next] = <[String; 4]>::try_from(cells)
            .map_err(|cells| {
                BinDayError::protocol(format!(
                    "schedule row {index} has {} cells, expected 4",
                    cells.len()
                ))
            })?;

        rows.push(CollectionScheduleRow {
            collection_type,
            next_collection: next,
        });
    }

    Ok(rows)
}
