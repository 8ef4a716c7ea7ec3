//! Scripted in-memory browser and page fixtures shared by the integration tests.

#![allow(dead_code)]

use kost_browser::{BrowserActions, BrowserError, Result};
use kost_core::{DelayRange, ScrapingConfig, SiteConfig};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

pub const ORIGIN: &str = "https://www.sewakost.com";
pub const BASE_URL: &str = "https://www.sewakost.com/kost-jakarta/";

/// What the fake browser does when a URL is navigated to.
#[derive(Debug, Clone)]
pub enum Response {
    Page { title: String, html: String },
    Timeout,
    SessionLost,
    Panic,
}

impl Response {
    pub fn page(title: &str, html: impl Into<String>) -> Self {
        Self::Page {
            title: title.to_string(),
            html: html.into(),
        }
    }
}

#[derive(Default)]
struct State {
    routes: HashMap<String, VecDeque<Response>>,
    current: Option<(String, String)>,
    navigations: Vec<String>,
    reloads: u32,
    shutdowns: u32,
    scripts: Vec<String>,
}

/// Browser fake answering navigations from per-URL response queues.
///
/// Each navigation pops the next response for the URL; the last one repeats.
/// Every wait predicate and script evaluates to `true`. Clones share state,
/// so a test can keep a handle after handing the fake to a `Session`.
#[derive(Default, Clone)]
pub struct FakeBrowser {
    state: Arc<Mutex<State>>,
}

impl FakeBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, response: Response) -> Self {
        self.route_seq(url, vec![response])
    }

    pub fn route_seq(self, url: &str, responses: Vec<Response>) -> Self {
        self.state
            .lock()
            .expect("fake state lock")
            .routes
            .insert(url.to_string(), responses.into());
        self
    }

    pub fn navigations_to(&self, url: &str) -> usize {
        self.state
            .lock()
            .expect("fake state lock")
            .navigations
            .iter()
            .filter(|u| *u == url)
            .count()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().expect("fake state lock").navigations.clone()
    }

    pub fn reloads(&self) -> u32 {
        self.state.lock().expect("fake state lock").reloads
    }

    pub fn shutdowns(&self) -> u32 {
        self.state.lock().expect("fake state lock").shutdowns
    }

    pub fn scripts(&self) -> Vec<String> {
        self.state.lock().expect("fake state lock").scripts.clone()
    }
}

#[async_trait::async_trait]
impl BrowserActions for FakeBrowser {
    async fn navigate(&self, url: &str) -> Result<()> {
        let response = {
            let mut state = self.state.lock().expect("fake state lock");
            state.navigations.push(url.to_string());
            state.current = None;

            match state.routes.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match response {
            Some(Response::Page { title, html }) => {
                self.state.lock().expect("fake state lock").current = Some((title, html));
                Ok(())
            }
            Some(Response::Timeout) => Err(BrowserError::Timeout(format!("loading {url}"))),
            Some(Response::SessionLost) => Err(BrowserError::SessionClosed),
            Some(Response::Panic) => panic!("scripted panic loading {url}"),
            None => Err(BrowserError::Navigation(format!("no route for {url}"))),
        }
    }

    async fn execute_script(&self, script: &str) -> Result<serde_json::Value> {
        self.state
            .lock()
            .expect("fake state lock")
            .scripts
            .push(script.to_string());
        Ok(serde_json::Value::Bool(true))
    }

    async fn page_source(&self) -> Result<String> {
        let state = self.state.lock().expect("fake state lock");
        state
            .current
            .as_ref()
            .map(|(_, html)| html.clone())
            .ok_or_else(|| BrowserError::Navigation("no page loaded".to_string()))
    }

    async fn title(&self) -> Result<String> {
        let state = self.state.lock().expect("fake state lock");
        state
            .current
            .as_ref()
            .map(|(title, _)| title.clone())
            .ok_or_else(|| BrowserError::Navigation("no page loaded".to_string()))
    }

    async fn reload(&self) -> Result<()> {
        self.state.lock().expect("fake state lock").reloads += 1;
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        self.state.lock().expect("fake state lock").shutdowns += 1;
        Ok(())
    }
}

/// Scraping settings with the default budgets and no waiting.
pub fn fast_scraping() -> ScrapingConfig {
    let mut config = ScrapingConfig::default();
    config.listing_retry.backoff = DelayRange::none();
    config.detail_retry.backoff = DelayRange::none();
    config.detail_delay = DelayRange::none();
    config.page_delay = DelayRange::none();
    config.element_timeout_ms = 100;
    config
}

pub fn site(last_page: u32) -> SiteConfig {
    SiteConfig {
        base_url: BASE_URL.to_string(),
        origin: ORIGIN.to_string(),
        first_page: 1,
        last_page,
    }
}

pub fn page_url(page: u32) -> String {
    if page == 1 {
        BASE_URL.to_string()
    } else {
        format!("{BASE_URL}index{page}.html")
    }
}

pub fn detail_url(slug: &str) -> String {
    format!("{ORIGIN}/kost-jakarta/{slug}.html")
}

/// Listing page with one card per slug, linked relative to the origin.
pub fn listing_page(slugs: &[&str]) -> Response {
    let cards: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<article class="item two-inline"><ul><li class="title"><a href="/kost-jakarta/{slug}.html">{slug}</a></li></ul></article>"#
            )
        })
        .collect();
    Response::page(
        "Kost Putri Jakarta",
        format!(r#"<html><body><section id="listings">{cards}</section></body></html>"#),
    )
}

/// Detail page with every field present.
pub fn full_detail(name: &str) -> Response {
    Response::page(
        name,
        format!(
            r#"<html><body>
                <h1 class="col-md-10">{name}</h1>
                <div class="seller-short"><ul><li class="name">Ibu Sari</li></ul></div>
                <div id="df_field_whatsapp"><div class="value">081234567890</div></div>
                <div id="df_field_price"><span>Rp 850.000</span></div>
                <div id="fs_1049">
                    <div id="df_field_nama_kost"><div class="value">{name}</div></div>
                    <div id="df_field_lokasi"><div class="value">DKI Jakarta</div></div>
                    <div id="df_field_lokasi_level1"><div class="value">Jakarta Selatan</div></div>
                    <div id="df_field_lokasi_level2"><div class="value">Tebet</div></div>
                    <div id="df_field_lokasi_level3"><div class="value">Tebet Barat</div></div>
                    <div id="df_field_address"><div class="value">Jl. Melati No. 5</div></div>
                </div>
                <div id="fs_1050">
                    <div id="df_field_fasilitas_kamar"><ul><li>AC</li><li>Kasur</li></ul></div>
                    <div id="df_field_fasilitas_kost"><ul><li>Dapur</li><li>Parkir motor</li></ul></div>
                    <div id="df_field_fasilitas_sekitar"><ul><li>Minimarket</li></ul></div>
                </div>
                <div id="df_field_additional_information"><div class="value"><p>Khusus putri</p><p>bebas banjir</p></div></div>
            </body></html>"#
        ),
    )
}

/// Detail page without any phone tier and without the location fieldset.
pub fn sparse_detail(name: &str) -> Response {
    Response::page(
        name,
        format!(
            r#"<html><body>
                <h1 class="col-md-10">{name}</h1>
                <div class="seller-short"><ul><li class="name">Pak Budi</li></ul></div>
                <div id="df_field_price"><span>Rp 700.000</span></div>
                <div id="fs_1050">
                    <div id="df_field_fasilitas_kamar"><ul><li>Kipas angin</li></ul></div>
                </div>
            </body></html>"#
        ),
    )
}

pub fn not_found_page() -> Response {
    Response::page(
        "404 - SewaKost",
        "<html><body><h2>Page Not Found</h2></body></html>",
    )
}
