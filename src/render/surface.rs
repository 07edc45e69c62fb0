//! # Rendering Surface
//!
//! A surface owns one print request's rendered content. Loading happens on
//! tokio's blocking pool; the caller waits for it with a hard ceiling.
//!
//! ## States
//!
//! ```text
//! Loading ──▶ Ready(Measurement)
//!    │
//!    └──────▶ Failed(reason)
//! ```
//!
//! [`Surface::wait_ready`] returns as soon as the state leaves `Loading`,
//! or with [`CupomError::NotReady`] once the ceiling elapses. A timed-out
//! surface is never printed from.

use std::time::Duration;

use image::GrayImage;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::CupomError;
use crate::payload::Payload;
use crate::printer::Measurement;

use super::rasterize::{self, RasterizeOptions};

/// Default readiness ceiling
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(10);

/// Observable state of a surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceState {
    Loading,
    Ready(Measurement),
    Failed(String),
}

impl SurfaceState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Rendered content plus the number of source pages it came from.
#[derive(Debug, Clone)]
pub struct Content {
    pub image: GrayImage,
    pub pages: usize,
}

/// A rendering surface for a single print request.
pub struct Surface {
    state: watch::Receiver<SurfaceState>,
    task: JoinHandle<Option<Content>>,
}

impl Surface {
    /// Start rendering `payload` at `width_dots`, at most `max_height_dots` tall.
    ///
    /// Must be called from within a tokio runtime.
    pub fn load(
        payload: Payload,
        width_dots: u32,
        max_height_dots: u32,
        options: RasterizeOptions,
    ) -> Self {
        Self::spawn(move || {
            let pages = rasterize::rasterize(&payload, &options)?;
            let image = rasterize::stack_pages(&pages, width_dots, max_height_dots)?;
            Ok(Content {
                image,
                pages: pages.len(),
            })
        })
    }

    /// Run an arbitrary render closure on the blocking pool.
    pub fn spawn<F>(render: F) -> Self
    where
        F: FnOnce() -> Result<Content, CupomError> + Send + 'static,
    {
        let (tx, rx) = watch::channel(SurfaceState::Loading);

        let task = tokio::task::spawn_blocking(move || match render() {
            Ok(content) => {
                let measurement = Measurement::new(content.image.width(), content.image.height());
                log::debug!(
                    "Surface ready: {}x{} px from {} page(s)",
                    measurement.width_px,
                    measurement.height_px,
                    content.pages
                );
                let _ = tx.send(SurfaceState::Ready(measurement));
                Some(content)
            }
            Err(e) => {
                let _ = tx.send(SurfaceState::Failed(e.to_string()));
                None
            }
        });

        Self { state: rx, task }
    }

    /// Current state without waiting.
    pub fn state(&self) -> SurfaceState {
        self.state.borrow().clone()
    }

    /// Wait until the surface is ready, failing after `ceiling`.
    pub async fn wait_ready(&mut self, ceiling: Duration) -> Result<Measurement, CupomError> {
        let state = match tokio::time::timeout(ceiling, self.state.wait_for(|s| !s.is_loading())).await {
            Err(_) => return Err(CupomError::NotReady(ceiling)),
            Ok(Err(_)) => {
                return Err(CupomError::Render(
                    "render worker exited without reporting".to_string(),
                ));
            }
            Ok(Ok(state)) => state.clone(),
        };

        match state {
            SurfaceState::Ready(measurement) => Ok(measurement),
            SurfaceState::Failed(reason) => Err(CupomError::Render(reason)),
            SurfaceState::Loading => Err(CupomError::NotReady(ceiling)),
        }
    }

    /// Take the rendered content, disposing of the surface.
    pub async fn into_content(self) -> Result<Content, CupomError> {
        match self.task.await {
            Ok(Some(content)) => Ok(content),
            Ok(None) => Err(CupomError::Render("surface failed to render".to_string())),
            Err(e) => Err(CupomError::Render(format!("render task error: {}", e))),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
