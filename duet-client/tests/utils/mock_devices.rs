use async_trait::async_trait;
use duet_client::media::MediaConstraints;
use duet_client::{MediaAccessError, MediaDevices, MediaStream, SampleTrackDevices};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Sample-track devices that count opens and can refuse permission.
#[derive(Clone, Default)]
pub struct MockDevices {
    opens: Arc<AtomicUsize>,
    deny: Arc<AtomicBool>,
}

impl MockDevices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn deny_permission(&self, deny: bool) {
        self.deny.store(deny, Ordering::SeqCst);
    }
}

#[async_trait]
impl MediaDevices for MockDevices {
    async fn open(&self, constraints: &MediaConstraints) -> Result<MediaStream, MediaAccessError> {
        self.opens.fetch_add(1, Ordering::SeqCst);
        if self.deny.load(Ordering::SeqCst) {
            return Err(MediaAccessError::PermissionDenied);
        }
        SampleTrackDevices::default().open(constraints).await
    }
}
