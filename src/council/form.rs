//! Fixed description of the council's bin collection form.
//!
//! Field names follow the forms-service convention `<FORMNAME>_<FIELD>`. Any
//! change on the council side to these names, the table container id, or the
//! table's column order breaks the flow and surfaces as a protocol error.

use url::Url;

use crate::council::session::SessionTokens;

const FORM_NAME: &str = "FINDBINCOLLECTIONDAYS";
const LANDING_PATH: &str = "bincollectiondays";
const FORM_SERVER_PATH: &str = "apiserver/formsservice/http/processsubmission";
const SCHEDULE_CONTAINER: &str = "FINDBINCOLLECTIONDAYS_FINDCOLLECTIONDAY_BINROUNDTABLEHTML";

/// Immutable URLs and field names for one deployment of the form.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub landing_url: Url,
    pub form_server_url: Url,
    pub form_name: String,
    pub schedule_container_id: String,
}

impl FormConfig {
    /// Derive every endpoint from the site's base URL (e.g. `https://www.guildford.gov.uk`).
    pub fn for_site(base_url: &Url) -> Result<Self, url::ParseError> {
        // `join` replaces the last path segment unless the base ends with a slash
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            landing_url: base.join(LANDING_PATH)?,
            form_server_url: base.join(FORM_SERVER_PATH)?,
            form_name: FORM_NAME.to_string(),
            schedule_container_id: SCHEDULE_CONTAINER.to_string(),
        })
    }

    /// Fully-qualified field name, e.g. `FINDBINCOLLECTIONDAYS_NONCE`.
    pub fn field(&self, field: &str) -> String {
        format!("{}_{field}", self.form_name)
    }

    /// Form-server URL authenticated by the current tokens.
    pub fn submission_url(&self, tokens: &SessionTokens) -> Url {
        let mut url = self.form_server_url.clone();
        url.query_pairs_mut()
            .append_pair("pageSessionId", tokens.page_session_id())
            .append_pair("fsid", tokens.session_id())
            .append_pair("fsn", tokens.nonce());
        url
    }

    /// Fields common to every submission.
    fn base_fields(&self, tokens: &SessionTokens, action: &str) -> Vec<(String, String)> {
        vec![
            (self.field("SESSIONID"), tokens.session_id().to_string()),
            (self.field("PAGESESSIONID"), tokens.page_session_id().to_string()),
            (self.field("NONCE"), tokens.nonce().to_string()),
            (self.field("PAGENAME"), "ADDRESSSEARCH".to_string()),
            (self.field("PAGEINSTANCE"), "1".to_string()),
            (self.field("VARIABLES"), String::new()),
            (self.field("FORMACTION_NEXT"), action.to_string()),
        ]
    }

    /// Body for the "find address" step.
    pub fn postcode_search(&self, tokens: &SessionTokens, postcode: &str) -> Vec<(String, String)> {
        let mut fields = self.base_fields(tokens, "Find address");
        fields.push((self.field("ADDRESSSEARCH_POSTCODE"), postcode.to_string()));
        fields
    }

    /// Body for the "find out bin collection day" step.
    ///
    /// The address list is a multi-select: it is sent as two values, an empty
    /// placeholder followed by the chosen key.
    pub fn address_pick(
        &self,
        tokens: &SessionTokens,
        postcode: &str,
        address_key: &str,
    ) -> Vec<(String, String)> {
        let mut fields = self.base_fields(tokens, "Find out bin collection day");
        if let Some(variables) = fields
            .iter_mut()
            .find(|(name, _)| *name == self.field("VARIABLES"))
        {
            // base64 of "{}"
            variables.1 = "e30=".to_string();
        }

        let address_list = self.field("ADDRESSSEARCH_ADDRESSLIST");
        fields.extend([
            (self.field("ADDRESSSEARCH_POSTCODE"), postcode.to_string()),
            (address_list.clone(), String::new()),
            (address_list, address_key.to_string()),
            (self.field("ADDRESSSEARCH_NOADDRESSFOUND"), "false".to_string()),
            (self.field("ADDRESSSEARCH_PICKADDRESSLAYOUT"), "true".to_string()),
            (
                self.field("ADDRESSSEARCH_SEARCHRESULTSCONDITIONAL"),
                "false".to_string(),
            ),
        ]);
        fields
    }
}
