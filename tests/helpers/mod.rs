//! Canned council pages and a lookup wired to a mock server.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use bindays::cache::AddressKeyCache;
use bindays::council::{FormConfig, FormPageClient, HttpSettings};
use bindays::lookup::BinDayLookup;
use url::Url;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const LANDING: &str = "/bincollectiondays";
pub const FORM_SERVER: &str = "/apiserver/formsservice/http/processsubmission";
pub const FIND_ADDRESS: &str = "FINDBINCOLLECTIONDAYS_FORMACTION_NEXT=Find+address";
pub const FIND_DAYS: &str = "FINDBINCOLLECTIONDAYS_FORMACTION_NEXT=Find+out+bin+collection+day";

fn hidden(field: &str, value: &str) -> String {
    format!(r#"<input type="hidden" name="FINDBINCOLLECTIONDAYS_{field}" value="{value}">"#)
}

fn tokens(nonce: &str) -> String {
    format!(
        "{}{}{}",
        hidden("PAGESESSIONID", "psid-1"),
        hidden("SESSIONID", "sid-1"),
        hidden("NONCE", nonce)
    )
}

/// Landing page issuing the first nonce.
pub fn landing_page(nonce: &str) -> String {
    format!("<html><body><form>{}</form></body></html>", tokens(nonce))
}

/// Postcode-search result listing `(option text, key)` pairs.
pub fn address_page(nonce: &str, options: &[(String, String)]) -> String {
    let options: String = options
        .iter()
        .map(|(text, key)| format!(r#"<option value="{key}">{text}</option>"#))
        .collect();
    format!(
        r#"<html><body><form>{}
        <select name="FINDBINCOLLECTIONDAYS_ADDRESSSEARCH_ADDRESSLIST">{options}</select>
        </form></body></html>"#,
        tokens(nonce)
    )
}

/// Houses 1..=count on one street, keyed `K<n>`.
pub fn street(count: u32) -> Vec<(String, String)> {
    (1..=count)
        .map(|n| (format!("{n}, HIGH STREET, GUILDFORD"), format!("K{n}")))
        .collect()
}

/// Address-pick result with a schedule table; each row is `[type, freq, last, next]`.
pub fn schedule_page(nonce: &str, rows: &[&[&str]]) -> String {
    let rows: String = rows
        .iter()
        .map(|cells| {
            let cells: String = cells.iter().map(|c| format!("<td>{c}</td>")).collect();
            format!("<tr>{cells}</tr>")
        })
        .collect();
    format!(
        r#"<html><body><form>{}
        <div id="FINDBINCOLLECTIONDAYS_FINDCOLLECTIONDAY_BINROUNDTABLEHTML"><table>
        <tr><th>Bin type</th><th>Frequency</th><th>Last collection</th><th>Next collection</th></tr>
        {rows}
        </table></div></form></body></html>"#,
        tokens(nonce)
    )
}

pub fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Landing page that also sets the session cookie.
pub async fn mount_landing(server: &MockServer, nonce: &str) {
    Mock::given(method("GET"))
        .and(path(LANDING))
        .respond_with(
            html(landing_page(nonce)).insert_header("set-cookie", "formsession=abc123; Path=/"),
        )
        .mount(server)
        .await;
}

/// Postcode search, only answered when authenticated by `expect_nonce`.
pub async fn mount_address_search(
    server: &MockServer,
    expect_nonce: &str,
    next_nonce: &str,
    options: &[(String, String)],
) {
    Mock::given(method("POST"))
        .and(path(FORM_SERVER))
        .and(query_param("fsn", expect_nonce))
        .and(body_string_contains(FIND_ADDRESS))
        .respond_with(html(address_page(next_nonce, options)))
        .mount(server)
        .await;
}

/// Address pick for `address_key`, only answered when authenticated by `expect_nonce`.
pub async fn mount_schedule(
    server: &MockServer,
    expect_nonce: &str,
    address_key: &str,
    rows: &[&[&str]],
) {
    Mock::given(method("POST"))
        .and(path(FORM_SERVER))
        .and(query_param("fsn", expect_nonce))
        .and(body_string_contains(FIND_DAYS))
        .and(body_string_contains(format!(
            "FINDBINCOLLECTIONDAYS_ADDRESSSEARCH_ADDRESSLIST=&FINDBINCOLLECTIONDAYS_ADDRESSSEARCH_ADDRESSLIST={address_key}&"
        )))
        .respond_with(html(schedule_page("nonce-final", rows)))
        .mount(server)
        .await;
}

pub fn client_for(server: &MockServer) -> FormPageClient {
    let base = Url::parse(&server.uri()).expect("mock server URI");
    let form = FormConfig::for_site(&base).expect("form config");
    FormPageClient::new(
        form,
        HttpSettings {
            timeout: Duration::from_secs(5),
            ..HttpSettings::default()
        },
    )
}

pub fn lookup_for(server: &MockServer, cache: Arc<dyn AddressKeyCache>) -> BinDayLookup {
    BinDayLookup::new(client_for(server), cache)
}

/// Number of received requests whose body contains `needle`.
pub async fn count_requests(server: &MockServer, needle: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| String::from_utf8_lossy(&r.body).contains(needle))
        .count()
}
