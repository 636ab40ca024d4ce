//! Camera effects
//!
//! Camera moves are visual only. They run on their own task, are never
//! awaited by the data pipeline and tolerate the view disappearing.

use crate::error::Result;
use crate::geometry::BoundingBox;
use crate::map::{FitOptions, MapView};
use serde::{Deserialize, Serialize};
use std::sync::Weak;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A camera movement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CameraCommand {
    FitBounds {
        bounds: BoundingBox,
        padding: u32,
        duration_ms: u64,
    },
}

impl CameraCommand {
    /// Fit `bounds` using the configured padding and duration
    pub fn fit(bounds: BoundingBox, options: &FitOptions) -> Self {
        CameraCommand::FitBounds {
            bounds,
            padding: options.padding,
            duration_ms: options.duration_ms,
        }
    }

    pub fn apply<V: MapView + ?Sized>(&self, view: &V) -> Result<()> {
        match *self {
            CameraCommand::FitBounds {
                bounds,
                padding,
                duration_ms,
            } => view.fit_bounds(bounds, padding, duration_ms),
        }
    }
}

/// Run `command` on `view` after `delay`
///
/// No-op if the view was dropped in the meantime. Failures are logged only.
pub fn spawn_camera<V>(view: Weak<V>, command: CameraCommand, delay: Duration) -> JoinHandle<()>
where
    V: MapView + 'static,
{
    tokio::spawn(async move {
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let Some(view) = view.upgrade() else {
            debug!("Map view gone before camera move, skipping");
            return;
        };

        if let Err(e) = command.apply(&*view) {
            warn!("Camera move failed: {}", e);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::recording::RecordingView;
    use std::sync::Arc;

    fn bounds() -> BoundingBox {
        BoundingBox {
            min_lng: -9.0,
            min_lat: 38.0,
            max_lng: -8.0,
            max_lat: 40.0,
        }
    }

    #[test]
    fn test_fit_uses_options() {
        let command = CameraCommand::fit(bounds(), &FitOptions::default());
        assert_eq!(
            command,
            CameraCommand::FitBounds {
                bounds: bounds(),
                padding: 50,
                duration_ms: 1000
            }
        );
    }

    #[tokio::test]
    async fn test_spawned_fit_reaches_view() {
        let view = Arc::new(RecordingView::default());
        let command = CameraCommand::fit(bounds(), &FitOptions::default());

        spawn_camera(Arc::downgrade(&view), command, Duration::from_millis(10))
            .await
            .unwrap();

        let fits = view.fits.lock().unwrap();
        assert_eq!(fits.as_slice(), &[(bounds(), 50, 1000)]);
    }

    #[tokio::test]
    async fn test_torn_down_view_is_noop() {
        let view = Arc::new(RecordingView::default());
        let weak = Arc::downgrade(&view);
        let command = CameraCommand::fit(bounds(), &FitOptions::default());

        let handle = spawn_camera(weak, command, Duration::from_millis(20));
        drop(view);

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_failed_move_does_not_panic() {
        let view = Arc::new(RecordingView {
            fail_fits: true,
            ..Default::default()
        });
        let command = CameraCommand::fit(bounds(), &FitOptions::default());

        let handle = spawn_camera(Arc::downgrade(&view), command, Duration::ZERO);
        assert!(handle.await.is_ok());
        assert!(view.fits.lock().unwrap().is_empty());
    }
}
