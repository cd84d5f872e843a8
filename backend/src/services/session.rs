//! Inspection session service
//!
//! Holds one field record and one stalk sample set per operator session and
//! drives the landing → analysis form flow.

use std::{collections::HashMap, sync::Arc};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;
use validator::Validate;

use crate::config::SessionConfig;
use crate::error::{AppError, AppResult};
use shared::{
    validate_stalk_counts, AggregateResult, ClassificationResult,
    FieldRecord, Language, Page, PieChartData, SampleSet, StalkSample,
};

/// In-memory session storage shared by all handlers
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, InspectionSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Drop sessions whose last update is older than `cutoff`; returns how many
fn evict_idle(sessions: &mut HashMap<Uuid, InspectionSession>, cutoff: DateTime<Utc>) -> usize {
    let before = sessions.len();
    sessions.retain(|_, session| session.updated_at >= cutoff);
    before - sessions.len()
}

/// One operator's inspection session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectionSession {
    pub id: Uuid,
    pub page: Page,
    pub field_record: FieldRecord,
    pub samples: SampleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InspectionSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            page: Page::Landing,
            field_record: FieldRecord::default(),
            samples: SampleSet::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Exports become available once at least one stalk was sampled
    pub fn exports_available(&self) -> bool {
        !self.samples.is_empty()
    }

    fn ensure_analysis(&self, action: &str) -> AppResult<()> {
        if self.page != Page::Analysis {
            return Err(AppError::InvalidStateTransition(format!(
                "cannot {} while on the {} page",
                action, self.page
            )));
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for InspectionSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Session as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    #[serde(flatten)]
    pub session: InspectionSession,
    pub exports_available: bool,
}

impl From<InspectionSession> for SessionView {
    fn from(session: InspectionSession) -> Self {
        let exports_available = session.exports_available();
        Self {
            session,
            exports_available,
        }
    }
}

/// Input for adding a stalk sample
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddSampleInput {
    #[validate(range(min = 1))]
    pub total_internodes: u32,
    pub damaged_internodes: u32,
}

/// Aggregate, classification and chart data for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub sample_count: usize,
    pub aggregate: AggregateResult,
    pub classification: ClassificationResult,
    pub chart: PieChartData,
}

impl AnalysisResults {
    pub fn from_samples(samples: &SampleSet, language: Language) -> Self {
        let aggregate = samples.aggregate();
        Self {
            sample_count: samples.len(),
            classification: ClassificationResult::new(aggregate.infestation_index, language),
            chart: PieChartData::from_aggregate(&aggregate),
            aggregate,
        }
    }
}

/// Session service for the inspection form flow
#[derive(Clone)]
pub struct SessionService {
    store: SessionStore,
    max_sessions: usize,
    idle_timeout: Duration,
}

impl SessionService {
    pub fn new(store: SessionStore, max_sessions: usize, idle_timeout: Duration) -> Self {
        Self {
            store,
            max_sessions,
            idle_timeout,
        }
    }

    pub fn from_config(store: SessionStore, config: &SessionConfig) -> Self {
        Self::new(
            store,
            config.max_sessions,
            Duration::minutes(config.idle_timeout_minutes),
        )
    }

    /// Open a new session on the landing page. Idle sessions are evicted
    /// first so abandoned ones do not hold slots.
    pub async fn create_session(&self) -> AppResult<InspectionSession> {
        let mut sessions = self.store.sessions.write().await;
        let evicted = evict_idle(&mut sessions, Utc::now() - self.idle_timeout);
        if evicted > 0 {
            tracing::info!(evicted, "Idle inspection sessions evicted");
        }

        if sessions.len() >= self.max_sessions {
            tracing::warn!(limit = self.max_sessions, "Session limit reached");
            return Err(AppError::SessionLimitReached(self.max_sessions));
        }

        let session = InspectionSession::new();
        sessions.insert(session.id, session.clone());
        tracing::info!(session_id = %session.id, "Inspection session created");
        Ok(session)
    }

    pub async fn get_session(&self, session_id: Uuid) -> AppResult<InspectionSession> {
        self.store
            .sessions
            .read()
            .await
            .get(&session_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound("Inspection session".to_string()))
    }

    pub async fn delete_session(&self, session_id: Uuid) -> AppResult<()> {
        let removed = self.store.sessions.write().await.remove(&session_id);
        if removed.is_none() {
            return Err(AppError::NotFound("Inspection session".to_string()));
        }
        tracing::info!(session_id = %session_id, "Inspection session deleted");
        Ok(())
    }

    /// Leave the landing page; a no-op when already analysing
    pub async fn continue_to_analysis(&self, session_id: Uuid) -> AppResult<InspectionSession> {
        self.update(session_id, |session| {
            if session.page == Page::Landing {
                session.page = Page::Analysis;
                tracing::debug!(session_id = %session.id, "Moved to analysis page");
            }
            Ok(())
        })
        .await
        .map(|(session, _)| session)
    }

    /// Return to the landing page with an empty field record and sample set
    pub async fn restart_session(&self, session_id: Uuid) -> AppResult<InspectionSession> {
        self.update(session_id, |session| {
            session.page = Page::Landing;
            session.field_record = FieldRecord::default();
            session.samples.clear();
            tracing::info!(session_id = %session.id, "Inspection session restarted");
            Ok(())
        })
        .await
        .map(|(session, _)| session)
    }

    /// Replace the field record as a whole
    pub async fn update_field_record(
        &self,
        session_id: Uuid,
        record: FieldRecord,
    ) -> AppResult<InspectionSession> {
        record.validate()?;

        self.update(session_id, move |session| {
            session.ensure_analysis("edit the field record")?;
            session.field_record = record;
            Ok(())
        })
        .await
        .map(|(session, _)| session)
    }

    /// Validate and append one stalk sample
    pub async fn add_sample(&self, session_id: Uuid, input: AddSampleInput) -> AppResult<StalkSample> {
        input.validate()?;
        validate_stalk_counts(input.total_internodes, input.damaged_internodes).map_err(|msg| {
            AppError::validation(
                "damaged_internodes",
                msg,
                "Los entrenudos barrenados no pueden superar el total de entrenudos",
            )
        })?;

        self.update(session_id, |session| {
            session.ensure_analysis("add a sample")?;
            let sample = session
                .samples
                .append(input.total_internodes, input.damaged_internodes);
            tracing::debug!(
                session_id = %session.id,
                sequence = sample.sequence,
                total = sample.total_internodes,
                damaged = sample.damaged_internodes,
                "Stalk sample added"
            );
            Ok(sample)
        })
        .await
        .map(|(_, sample)| sample)
    }

    /// Remove the most recent sample; returns whether one was removed and
    /// the remaining sample count
    pub async fn remove_last_sample(&self, session_id: Uuid) -> AppResult<(bool, usize)> {
        self.update(session_id, |session| {
            session.ensure_analysis("remove a sample")?;
            let removed = session.samples.remove_last();
            Ok((removed, session.samples.len()))
        })
        .await
        .map(|(_, output)| output)
    }

    pub async fn clear_samples(&self, session_id: Uuid) -> AppResult<InspectionSession> {
        self.update(session_id, |session| {
            session.ensure_analysis("clear samples")?;
            session.samples.clear();
            Ok(())
        })
        .await
        .map(|(session, _)| session)
    }

    /// Aggregate and classify the current sample set
    pub async fn get_results(&self, session_id: Uuid, language: Language) -> AppResult<AnalysisResults> {
        let session = self.get_session(session_id).await?;
        Ok(AnalysisResults::from_samples(&session.samples, language))
    }

    /// Apply a mutation under the store lock. The session is only written
    /// back (and timestamped) when the mutation succeeds.
    async fn update<T, F>(&self, session_id: Uuid, mutate: F) -> AppResult<(InspectionSession, T)>
    where
        F: FnOnce(&mut InspectionSession) -> AppResult<T>,
    {
        let mut sessions = self.store.sessions.write().await;
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| AppError::NotFound("Inspection session".to_string()))?;

        let mut draft = session.clone();
        let output = mutate(&mut draft)?;
        draft.touch();
        *session = draft;

        Ok((session.clone(), output))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(max_sessions: usize) -> SessionService {
        SessionService::new(SessionStore::new(), max_sessions, Duration::minutes(30))
    }

    async fn backdate(service: &SessionService, session_id: Uuid, minutes: i64) {
        let mut sessions = service.store.sessions.write().await;
        if let Some(session) = sessions.get_mut(&session_id) {
            session.updated_at = Utc::now() - Duration::minutes(minutes);
        }
    }

    #[tokio::test]
    async fn abandoned_sessions_free_their_slot() {
        let service = service(1);
        let abandoned = service.create_session().await.unwrap();
        backdate(&service, abandoned.id, 31).await;

        let fresh = service.create_session().await.unwrap();
        assert_ne!(fresh.id, abandoned.id);
        assert!(matches!(
            service.get_session(abandoned.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.store.len().await, 1);
    }

    #[tokio::test]
    async fn recently_used_sessions_keep_the_limit() {
        let service = service(1);
        let active = service.create_session().await.unwrap();
        backdate(&service, active.id, 29).await;

        assert!(matches!(
            service.create_session().await,
            Err(AppError::SessionLimitReached(1))
        ));
        assert!(service.get_session(active.id).await.is_ok());
    }

    #[tokio::test]
    async fn remove_last_reports_remaining_count() {
        let service = service(4);
        let session = service.create_session().await.unwrap();
        service.continue_to_analysis(session.id).await.unwrap();
        for (total, damaged) in [(10, 1), (12, 0)] {
            service
                .add_sample(
                    session.id,
                    AddSampleInput {
                        total_internodes: total,
                        damaged_internodes: damaged,
                    },
                )
                .await
                .unwrap();
        }

        assert_eq!(service.remove_last_sample(session.id).await.unwrap(), (true, 1));
        assert_eq!(service.remove_last_sample(session.id).await.unwrap(), (true, 0));
        assert_eq!(service.remove_last_sample(session.id).await.unwrap(), (false, 0));
    }

    #[tokio::test]
    async fn overlong_field_text_is_rejected_once_by_the_validator() {
        let service = service(4);
        let session = service.create_session().await.unwrap();
        service.continue_to_analysis(session.id).await.unwrap();

        let record = FieldRecord {
            farm: "x".repeat(121),
            ..Default::default()
        };
        match service.update_field_record(session.id, record).await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "farm"),
            other => panic!("expected farm validation error, got {:?}", other),
        }
        assert_eq!(service.get_session(session.id).await.unwrap().field_record, FieldRecord::default());
    }
}
