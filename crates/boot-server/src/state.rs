//! Shared handler state

use crate::error::ServerError;
use crate::metrics::MetricsObserver;
use crate::observer::{MatchObserver, MatchOutcome, Observers, TracingObserver};
use boot_core::{BootSelector, CoreError, GrubRenderer, IpxeRenderer, Renderer, Selection, resolve};
use boot_model::LabelSet;
use boot_store::BootStore;
use std::sync::Arc;

/// State shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub selector: BootSelector<dyn BootStore>,
    pub ipxe: Arc<IpxeRenderer>,
    pub grub: Arc<GrubRenderer>,
    pub observer: Arc<dyn MatchObserver>,
    pub metrics: MetricsObserver,
}

impl AppState {
    /// Creates state over `store` with the default renderers and observers.
    pub fn new(store: Arc<dyn BootStore>) -> Result<Self, ServerError> {
        let metrics = MetricsObserver::new()?;
        let observers: Vec<Arc<dyn MatchObserver>> =
            vec![Arc::new(TracingObserver), Arc::new(metrics.clone())];

        Ok(Self {
            selector: BootSelector::new(store),
            ipxe: Arc::new(IpxeRenderer::new()),
            grub: Arc::new(GrubRenderer::new()),
            observer: Arc::new(Observers::new(observers)),
            metrics,
        })
    }

    /// Replaces the GRUB2 renderer
    #[must_use]
    pub fn with_grub(mut self, grub: GrubRenderer) -> Self {
        self.grub = Arc::new(grub);
        self
    }

    /// Replaces the match observer. Metrics are still served but no longer counted.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn MatchObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn store(&self) -> &Arc<dyn BootStore> {
        self.selector.store()
    }

    /// Selects the group and profile for `labels`, reporting failures.
    ///
    /// Successful selections are reported by the caller once it has served
    /// the profile, since serving can still fail.
    pub async fn select(&self, endpoint: &str, labels: &LabelSet) -> Result<Selection, CoreError> {
        let result = self.selector.select(labels).await;
        if let Err(err) = &result {
            self.observer.observe(endpoint, labels, MatchOutcome::Failed(err));
        }
        result
    }

    /// Selects a profile for `labels` and renders it with `renderer`.
    pub async fn render(
        &self,
        endpoint: &str,
        labels: &LabelSet,
        renderer: &dyn Renderer,
    ) -> Result<String, CoreError> {
        let selection = self.select(endpoint, labels).await?;
        let result = renderer.render(resolve(&selection.profile));
        self.report(endpoint, labels, &selection, result.as_ref().err());
        result
    }

    /// Reports the outcome of serving `selection`.
    pub fn report(&self, endpoint: &str, labels: &LabelSet, selection: &Selection, err: Option<&CoreError>) {
        let outcome = match err {
            Some(err) => MatchOutcome::Failed(err),
            None => MatchOutcome::Matched(&selection.group),
        };
        self.observer.observe(endpoint, labels, outcome);
    }
}
