//! Scripted shopper sessions.
//!
//! A session script describes one page and the interactions performed on it:
//!
//! ```json
//! {
//!   "page": {"url": "https://shop.example/", "title": "Shop", "pageType": "home"},
//!   "custData": {"custId": "C-1", "loginStatus": "logged-in"},
//!   "steps": [
//!     {"type": "click", "data": {"data-action": "view-product", "data-product-id": "sku-1", "data-href": "/pdp/sku-1"}},
//!     {"type": "addToCart", "fields": {"id": "sku-1", "qty": "2"}, "data": {"data-product-name": "Mug"}},
//!     {"type": "click", "data": {"data-role": "cart-link"}, "href": "/cart"},
//!     {"type": "search", "query": "lamp"}
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use turbo_data::FetchClient;
use turbo_storefront::analytics::{DataLayer, InMemoryDataLayer};
use turbo_storefront::cart::{BadgeView, CartBadge};
use turbo_storefront::clock::SystemClock;
use turbo_storefront::interaction::{
    Action, Dataset, HeadlessPage, InteractionController, Outcome, SearchDecision,
};
use turbo_storefront::StorefrontConfig;

use super::SessionArgs;
use crate::context::Context;
use crate::output::event_badge;

/// Run the session command.
pub async fn run(args: SessionArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.script);
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read session script: {}", path.display()))?;
    let script: SessionScript = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse session script: {}", path.display()))?;

    let http = ctx.http(args.base_url.as_deref())?;
    let mut config = ctx.config.clone();
    if let Some(url) = &args.base_url {
        config.api.base_url = url.clone();
    }

    ctx.output.debug(&format!("Running {} steps", script.steps.len()));
    let report = run_script(&script, &config, http).await;

    if args.events_only {
        ctx.output.json(&report.data_layer);
        return Ok(());
    }
    if ctx.output.is_json() {
        ctx.output.json(&report);
        return Ok(());
    }

    ctx.output.header("Session");
    let total = report.steps.len();
    for (i, step) in report.steps.iter().enumerate() {
        let line = format!("{}: {}", step.kind, step.result);
        if step.failed {
            ctx.output.warn(&line);
        } else {
            ctx.output.step(i + 1, total, &line);
        }
    }

    ctx.output.header("Data layer");
    for record in &report.data_layer {
        match record.get("event").and_then(Value::as_str) {
            Some(event) => ctx.output.list_item(&event_badge(event)),
            None => ctx.output.list_item("(initial record)"),
        }
    }

    ctx.output.info("");
    ctx.output.kv(
        "Cart badge",
        report.badge.as_deref().unwrap_or("(never set)"),
    );
    ctx.output.success(&format!("{} events emitted", report.events()));
    Ok(())
}

/// Session script file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionScript {
    #[serde(default)]
    pub page: PageSpec,
    /// Identity block pushed to the data layer before the session starts.
    #[serde(default)]
    pub cust_data: Option<Value>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// The page the session runs on.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpec {
    #[serde(default = "default_page_url")]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub page_type: Option<String>,
    /// Whether the page has an add-to-cart notice element.
    #[serde(default = "default_true")]
    pub notice: bool,
}

fn default_page_url() -> String {
    "http://localhost/".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            url: default_page_url(),
            title: String::new(),
            page_type: None,
            notice: true,
        }
    }
}

impl PageSpec {
    fn build(&self) -> HeadlessPage {
        let mut page = HeadlessPage::new(self.url.clone()).with_title(self.title.clone());
        if let Some(page_type) = &self.page_type {
            page = page.with_page_type(page_type.clone());
        }
        if !self.notice {
            page = page.without_notice();
        }
        page
    }
}

/// One scripted interaction.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    /// Click on an element with the given attributes.
    Click {
        #[serde(default)]
        data: BTreeMap<String, String>,
        #[serde(default)]
        href: Option<String>,
    },
    /// Submit the add-to-cart form.
    AddToCart {
        #[serde(default)]
        fields: BTreeMap<String, String>,
        #[serde(default)]
        data: BTreeMap<String, String>,
    },
    /// Submit the search form.
    Search {
        #[serde(default)]
        query: Option<String>,
    },
}

impl Step {
    fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::AddToCart { .. } => "addToCart",
            Self::Search { .. } => "search",
        }
    }
}

/// What happened in a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub steps: Vec<StepReport>,
    /// Last text written to the cart badge.
    pub badge: Option<String>,
    pub data_layer: Vec<Value>,
}

impl SessionReport {
    /// Records carrying an `event` field.
    pub fn events(&self) -> usize {
        self.data_layer
            .iter()
            .filter(|r| r.get("event").is_some())
            .count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub kind: &'static str,
    pub result: String,
    pub failed: bool,
}

#[derive(Default)]
struct RecordedBadge(Mutex<Option<String>>);

impl RecordedBadge {
    fn text(&self) -> Option<String> {
        self.0.lock().ok().and_then(|t| t.clone())
    }
}

impl BadgeView for RecordedBadge {
    fn set_text(&self, text: &str) {
        if let Ok(mut current) = self.0.lock() {
            *current = Some(text.to_string());
        }
    }
}

/// Run every step of `script` against the cart API behind `http`.
///
/// Step failures are recorded and the session carries on.
pub async fn run_script(
    script: &SessionScript,
    config: &StorefrontConfig,
    http: FetchClient,
) -> SessionReport {
    let layer = InMemoryDataLayer::new();
    if let Some(cust) = &script.cust_data {
        layer.push(serde_json::json!({ "custData": cust }));
    }
    let badge = Arc::new(RecordedBadge::default());

    let controller = InteractionController::from_config(
        config,
        http,
        Arc::new(layer.clone()),
        Arc::new(SystemClock),
        Arc::new(script.page.build()),
    )
    .with_badge(CartBadge::new(badge.clone()));

    controller.init().await;

    let mut steps = Vec::with_capacity(script.steps.len());
    for step in &script.steps {
        let (result, failed) = match run_step(&controller, step).await {
            Ok(result) => (result, false),
            Err(e) => (format!("{:#}", e), true),
        };
        tracing::debug!(kind = step.kind(), failed, "session step finished");
        steps.push(StepReport {
            kind: step.kind(),
            result,
            failed,
        });
    }

    SessionReport {
        steps,
        badge: badge.text(),
        data_layer: layer.snapshot(),
    }
}

async fn run_step(controller: &InteractionController, step: &Step) -> Result<String> {
    let action = match step {
        Step::Click { data, href } => {
            match Action::from_click(&data.iter().collect::<Dataset>(), href.as_deref()) {
                Some(action) => action,
                None => return Ok("ignored".to_string()),
            }
        }
        Step::AddToCart { fields, data } => Action::add_to_cart(
            &fields.iter().collect::<Dataset>(),
            &data.iter().collect::<Dataset>(),
        ),
        Step::Search { query } => {
            return Ok(match InteractionController::validate_search(query.as_deref()) {
                SearchDecision::Submit => "submitted".to_string(),
                SearchDecision::Prevent => "prevented".to_string(),
            });
        }
    };

    let outcome = controller.handle(action).await?;
    Ok(describe(&outcome))
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Navigated(href) => format!("navigated to {}", href),
        Outcome::Reloaded => "reloaded".to_string(),
        Outcome::Stayed { notice_shown: true } => "stayed (notice shown)".to_string(),
        Outcome::Stayed {
            notice_shown: false,
        } => "stayed".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use turbo_data::ScriptedTransport;

    #[test]
    fn test_parse_script() {
        let script: SessionScript = serde_json::from_value(json!({
            "page": {"pageType": "pdp", "notice": false},
            "steps": [
                {"type": "click", "data": {"data-role": "cart-link"}, "href": "/cart"},
                {"type": "addToCart", "fields": {"id": "X"}},
                {"type": "search"}
            ]
        }))
        .unwrap();

        assert_eq!(script.page.url, "http://localhost/");
        assert!(!script.page.notice);
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.steps[1].kind(), "addToCart");
        assert!(matches!(&script.steps[2], Step::Search { query: None }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_script_against_scripted_cart() {
        let transport = ScriptedTransport::new();
        transport
            .reply_json(json!({"items": [{"productId": "A", "qty": 2}]}))
            .reply_json(json!({"items": [{"productId": "A", "qty": 2}, {"productId": "X", "qty": 1}]}))
            .fail("connection reset");

        let script: SessionScript = serde_json::from_value(json!({
            "page": {"url": "https://shop.example/pdp/X", "pageType": "pdp"},
            "custData": {"custId": "C-1"},
            "steps": [
                {"type": "addToCart", "fields": {"id": "X", "qty": ""}, "data": {"data-product-name": "Mug"}},
                {"type": "click", "data": {"data-action": "remove-item", "data-product-id": "A"}},
                {"type": "click", "data": {"data-role": "cart-count"}},
                {"type": "search", "query": "  "}
            ]
        }))
        .unwrap();

        let report = run_script(
            &script,
            &StorefrontConfig::default(),
            FetchClient::new(transport.clone()),
        )
        .await;

        let results: Vec<_> = report.steps.iter().map(|s| s.result.as_str()).collect();
        assert_eq!(results[0], "stayed (notice shown)");
        assert!(report.steps[1].failed);
        assert_eq!(results[2], "ignored");
        assert_eq!(results[3], "prevented");

        assert_eq!(report.badge.as_deref(), Some("3"));
        assert_eq!(report.events(), 1);
        assert_eq!(report.data_layer[1]["event"], "scAdd");
        assert_eq!(report.data_layer[1]["custData"]["custId"], "C-1");
        assert_eq!(
            transport.requests()[1].json_body(),
            Some(json!({"id": "X", "qty": 1}))
        );
    }
}
