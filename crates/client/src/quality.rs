//! Farmer quality review against the sheet quality service.
//!
//! Samples load without analysis. Impurity detection runs per sample on
//! demand; "detect all" runs the same detection over the filtered samples one
//! at a time. A manual upload reloads the sample list from the service.

use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use rubberwatch_core::attachments::Attachment;
use rubberwatch_core::quality::{
    validate_upload, ImpurityResult, QualityFilter, QualityReview, QualitySample, QualityView,
};

use crate::api::{ApiError, Service, UpstreamApi};
use crate::error::ClientError;

const PAGE: &str = "farmer-quality";

/// File name the sample photograph is re-uploaded under.
const SAMPLE_FILE_NAME: &str = "sheet.jpg";

struct Mount {
    review: QualityReview,
    token: CancellationToken,
}

/// Quality review page for one farmer at a time.
pub struct QualityReviewer {
    api: Arc<UpstreamApi>,
    mount: Mutex<Option<Mount>>,
}

impl QualityReviewer {
    pub fn new(api: Arc<UpstreamApi>) -> Self {
        Self {
            api,
            mount: Mutex::new(None),
        }
    }

    /// Open the review for `farmer_id` and load its samples.
    pub async fn mount(&self, farmer_id: &str) -> Result<QualityView, ClientError> {
        {
            let mut mount = self.mount.lock().await;
            if let Some(previous) = mount.take() {
                previous.token.cancel();
            }
            *mount = Some(Mount {
                review: QualityReview::new(farmer_id),
                token: CancellationToken::new(),
            });
        }
        tracing::info!(farmer_id, "Quality review mounted");
        self.load(farmer_id).await?;
        self.view(farmer_id, &QualityFilter::default()).await
    }

    pub async fn unmount(&self) {
        if let Some(previous) = self.mount.lock().await.take() {
            previous.token.cancel();
        }
    }

    pub async fn view(
        &self,
        farmer_id: &str,
        filter: &QualityFilter,
    ) -> Result<QualityView, ClientError> {
        let guard = self.mount.lock().await;
        let mount = Self::mounted(&guard, farmer_id)?;
        Ok(mount.review.view(filter))
    }

    /// Fetch the graded samples (`GET /get_rubber_sheet_quality`).
    pub async fn load(&self, farmer_id: &str) -> Result<(), ClientError> {
        let token = self.token(farmer_id).await?;
        let result: Result<Vec<QualitySample>, ApiError> = self
            .api
            .get_json(
                Service::Quality,
                "/get_rubber_sheet_quality",
                &[("farmer_id", farmer_id.to_string())],
            )
            .await;

        let mut guard = self.current(&token).await?;
        let review = &mut Self::mounted_mut(&mut guard, farmer_id)?.review;
        match result {
            Ok(samples) => {
                tracing::debug!(farmer_id, count = samples.len(), "Quality samples loaded");
                review.replace_samples(samples);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(farmer_id, error = %e, "Failed to load quality samples");
                review.replace_samples(Vec::new());
                review.error = Some("Failed to load rubber sheet quality data.".into());
                Err(e.into())
            }
        }
    }

    /// Analyse sample `index` unless it already has (or is getting) a result.
    pub async fn detect(&self, farmer_id: &str, index: usize) -> Result<(), ClientError> {
        self.detect_in(farmer_id, index, None).await
    }

    /// Detection against the list loaded as `generation`, or whatever list is
    /// loaded when `None`.
    async fn detect_in(
        &self,
        farmer_id: &str,
        index: usize,
        generation: Option<u64>,
    ) -> Result<(), ClientError> {
        let (token, claim) = {
            let mut guard = self.mount.lock().await;
            let mount = Self::mounted_mut(&mut guard, farmer_id)?;
            if generation.is_some_and(|g| g != mount.review.generation()) {
                tracing::debug!(farmer_id, "Samples reloaded, stopping detection run");
                return Err(ClientError::Stale(PAGE));
            }
            match mount.review.begin_detection(index)? {
                Some(claim) => (mount.token.clone(), claim),
                None => return Ok(()),
            }
        };

        let result = self.analyse(&claim.sample).await;

        let mut guard = self.current(&token).await?;
        let review = &mut Self::mounted_mut(&mut guard, farmer_id)?.review;
        let outcome = match &result {
            Ok(impurity) => Ok(impurity.clone()),
            Err(_) => Err("Could not analyze impurity.".to_string()),
        };
        if !review.finish_detection(&claim, outcome) {
            tracing::debug!(farmer_id, index, "Discarding impurity result for a reloaded list");
            return Err(ClientError::Stale(PAGE));
        }
        match result {
            Ok(impurity) => {
                tracing::info!(
                    farmer_id,
                    index,
                    impurity = impurity.impurity_percentage,
                    "Impurity detected"
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(farmer_id, index, error = %e, "Impurity detection failed");
                Err(e.into())
            }
        }
    }

    /// Detect every sample matching `filter`, one after another.
    ///
    /// A failed sample does not stop the run; the first failure is returned
    /// once every sample has been tried.
    pub async fn detect_all(
        &self,
        farmer_id: &str,
        filter: &QualityFilter,
    ) -> Result<QualityView, ClientError> {
        let (generation, positions) = {
            let guard = self.mount.lock().await;
            let review = &Self::mounted(&guard, farmer_id)?.review;
            (review.generation(), review.filtered_positions(filter))
        };
        tracing::info!(farmer_id, samples = positions.len(), "Detecting all samples");

        let mut first_error = None;
        for index in positions {
            match self.detect_in(farmer_id, index, Some(generation)).await {
                Ok(()) => {}
                Err(e @ (ClientError::Stale(_) | ClientError::NotMounted(_))) => return Err(e),
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => self.view(farmer_id, filter).await,
        }
    }

    /// Upload a sample with a hand-assigned grade, then reload the samples.
    pub async fn upload(
        &self,
        farmer_id: &str,
        rubber_grade: &str,
        image: Option<Attachment>,
        remarks: Option<Attachment>,
    ) -> Result<QualityView, ClientError> {
        validate_upload(rubber_grade, image.is_some())?;
        let token = self.token(farmer_id).await?;

        let mut form = Form::new().text("rubber_grade", rubber_grade.trim().to_string());
        for attachment in [image, remarks].into_iter().flatten() {
            form = form.part(attachment.field.clone(), Self::part(attachment)?);
        }
        self.api
            .post_multipart(Service::Quality, "/upload", form)
            .await?;
        tracing::info!(farmer_id, rubber_grade, "Quality sample uploaded");

        if token.is_cancelled() {
            return Err(ClientError::Stale(PAGE));
        }
        self.load(farmer_id).await?;
        self.view(farmer_id, &QualityFilter::default()).await
    }

    // ---- private helpers ----

    /// Download the sample photograph and submit it for impurity detection.
    async fn analyse(&self, sample: &QualitySample) -> Result<ImpurityResult, ApiError> {
        let bytes = self.api.download(&sample.file_path).await?;
        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(SAMPLE_FILE_NAME))
            .text("farmer_id", sample.farmer_id.clone());
        let reply = self
            .api
            .post_multipart(Service::Quality, "/impurity_detection", form)
            .await?;
        UpstreamApi::unwrap_envelope(reply)
    }

    fn part(attachment: Attachment) -> Result<Part, ApiError> {
        let part = Part::bytes(attachment.bytes).file_name(attachment.file_name);
        match attachment.content_type {
            Some(content_type) => part
                .mime_str(&content_type)
                .map_err(|e| ApiError::Encoding(e.to_string())),
            None => Ok(part),
        }
    }

    async fn token(&self, farmer_id: &str) -> Result<CancellationToken, ClientError> {
        let guard = self.mount.lock().await;
        Ok(Self::mounted(&guard, farmer_id)?.token.clone())
    }

    async fn current(
        &self,
        token: &CancellationToken,
    ) -> Result<tokio::sync::MutexGuard<'_, Option<Mount>>, ClientError> {
        let guard = self.mount.lock().await;
        if token.is_cancelled() {
            tracing::debug!("Discarding quality response for unmounted page");
            return Err(ClientError::Stale(PAGE));
        }
        Ok(guard)
    }

    fn mounted<'a>(mount: &'a Option<Mount>, farmer_id: &str) -> Result<&'a Mount, ClientError> {
        mount
            .as_ref()
            .filter(|m| m.review.farmer_id() == farmer_id)
            .ok_or(ClientError::NotMounted(PAGE))
    }

    fn mounted_mut<'a>(
        mount: &'a mut Option<Mount>,
        farmer_id: &str,
    ) -> Result<&'a mut Mount, ClientError> {
        mount
            .as_mut()
            .filter(|m| m.review.farmer_id() == farmer_id)
            .ok_or(ClientError::NotMounted(PAGE))
    }
}
