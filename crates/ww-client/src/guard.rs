//! Navigation guard
//!
//! Applies the monitoring policy around the match engine for one
//! navigation: which pages are skipped, where blocked navigations go, and
//! whether an allowed visit gets reported.

use ww_core::policy::{is_internal_page, is_notice_page, notice_url, should_track_url, PolicyError};
use ww_core::Matcher;

use crate::api::ApiClient;
use crate::provider::{RuleSetProvider, RuleSource};
use crate::settings::Settings;
use crate::visit::Visit;

/// A navigation as reported by the browser.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    pub url: String,
    /// 0 for the main frame
    pub frame_id: i32,
    pub incognito: bool,
    /// Page the user came from, when known
    pub referrer: Option<String>,
}

impl Navigation {
    pub fn main_frame(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Why a navigation was not checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MonitoringDisabled,
    SubFrame,
    InternalPage,
    NoticePage,
}

/// What the caller should do with a navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Not checked at all
    Skip(SkipReason),
    /// Send the tab to the notice page
    Redirect { notice_url: String, reason: Option<String> },
    /// Let it through; `track` says whether to report the visit
    Allow { track: bool },
}

pub struct NavigationGuard<S> {
    settings: Settings,
    provider: RuleSetProvider<S>,
    matcher: Matcher,
    notice_page: String,
    reporter: Option<ApiClient>,
}

impl<S: RuleSource> NavigationGuard<S> {
    /// `notice_page` must be an absolute URL of the extension's notice page.
    pub fn new(settings: Settings, source: S, notice_page: &str) -> Result<Self, PolicyError> {
        // Validate once so check() only fails on bad input URLs, never on config
        url::Url::parse(notice_page)?;

        Ok(Self {
            matcher: Matcher::with_host_case(settings.host_case),
            provider: RuleSetProvider::new(source, settings.on_fetch_failure),
            notice_page: notice_page.to_string(),
            reporter: None,
            settings,
        })
    }

    /// Report allowed visits through this client.
    pub fn with_reporter(mut self, reporter: ApiClient) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// Decide what to do with a navigation. Refreshes the rule set first.
    pub async fn check(&self, nav: &Navigation) -> NavigationOutcome {
        if !self.settings.monitoring_enabled {
            log::debug!("monitoring disabled, skipping {}", nav.url);
            return NavigationOutcome::Skip(SkipReason::MonitoringDisabled);
        }
        if nav.frame_id != 0 {
            return NavigationOutcome::Skip(SkipReason::SubFrame);
        }
        if is_internal_page(&nav.url) {
            return NavigationOutcome::Skip(SkipReason::InternalPage);
        }
        if is_notice_page(&nav.url) {
            return NavigationOutcome::Skip(SkipReason::NoticePage);
        }

        let rules = self.provider.refresh().await;
        let decision = self.matcher.evaluate(&nav.url, &rules);

        if decision.is_blocked() {
            log::info!("Blocked navigation to {} ({})", nav.url, decision.display_reason());
            match notice_url(&self.notice_page, &nav.url, decision.reason(), nav.referrer.as_deref()) {
                Ok(url) => {
                    return NavigationOutcome::Redirect {
                        notice_url: url.into(),
                        reason: decision.reason().map(str::to_string),
                    }
                }
                // notice_page was validated in new()
                Err(e) => log::warn!("Cannot build notice page URL: {}", e),
            }
        }

        let track = should_track_url(&nav.url, self.settings.track_local)
            && (!nav.incognito || self.settings.track_incognito);
        NavigationOutcome::Allow { track }
    }

    /// Report a visit. Failures are logged, never returned.
    pub async fn record_visit(&self, visit: &Visit) {
        let Some(reporter) = &self.reporter else {
            log::debug!("no reporter configured, dropping visit to {}", visit.url);
            return;
        };

        match reporter.report_visit(visit).await {
            Ok(()) => log::debug!("visit tracked: {}", visit.url),
            Err(e) => log::warn!("Failed to track visit to {}: {}", visit.url, e),
        }
    }
}
