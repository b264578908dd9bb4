// [apps/orchestrator/src/orchestrator.rs]
/*!
 * =================================================================
 * APARATO: ORCHESTRATOR SOVEREIGN CORE (C9)
 * CLASIFICACIÓN: COMPOSITION ROOT (ESTRATO L1-APP)
 * RESPONSABILIDAD: SINAPSIS ENTRE C1-C8 Y CONTRATO EXTERNO
 *
 * Cablea el verificador de integridad, la sonda de recursos, los gestores
 * de degradación y energía, el log de auditoría, la caché de respuestas,
 * el vigilante de procesos y la cola de peticiones en un único punto de
 * entrada consumido por la capa HTTP (§6).
 * =================================================================
 */

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, RwLock};
use std::time::Duration;

use aegis_core_audit::{AuditConfig, AuditDraft, AuditLogger, AuditPage, AuditQuery};
use aegis_core_cache::{spawn_cleanup_task, CacheConfig, CacheStats, ResponseCache};
use aegis_core_degradation::{DegradationConfig, DegradationHandle, DegradationManager, QueueSignal};
use aegis_core_integrity::{quick_check, HashDatabase, VerifyResult};
use aegis_core_power::{PowerConfig, PowerHandle, PowerManager, SysfsPowerSource};
use aegis_core_queue::{spawn_dispatcher, AdmissionContext, BoxFuture, ProcessFn, RequestQueue};
use aegis_core_resource::ResourceProbe;
use aegis_core_watchdog::{ProcessConfig, PortPool, Supervised};
use aegis_domain_models::prelude::*;
use aegis_infra_backend_client::{BackendClient, CompletionRequest, Usage};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::OrchestratorConfig;

/// One admitted inference request (§3 Queue entry payload).
#[derive(Debug, Clone)]
pub struct InferenceJob {
    pub model_id: String,
    pub prompt: String,
    pub params: Vec<(String, String)>,
    pub max_tokens: u32,
    pub stream: bool,
}

/// Either a finished completion or a live channel of text deltas, depending
/// on whether the job requested streaming. Routing both shapes through the
/// same `RequestQueue<InferenceJob, InferenceOutcome>` keeps priority
/// ordering and concurrency bounding identical for `Submit` and
/// `SubmitStream` — a single admission path rather than two.
pub enum InferenceOutcome {
    Complete { text: String, usage: Usage },
    Stream(mpsc::Receiver<Result<String, AppError>>),
}

/// Read-only orchestrator-wide snapshot for the `/status` surface (§6).
#[derive(Debug, Clone, serde::Serialize)]
pub struct OrchestratorStatus {
    pub level: DegradationLevel,
    pub power: PowerSnapshot,
    pub queue: QueueStatusView,
    pub backends: Vec<BackendStatus>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct QueueStatusView {
    pub queued: usize,
    pub running: usize,
    pub completed_ok: u64,
    pub completed_error: u64,
    pub rejected: u64,
    pub average_wait_micros: f64,
    pub average_run_micros: f64,
}

struct QueueSignalAdapter(Arc<RequestQueue<InferenceJob, InferenceOutcome>>);

impl QueueSignal for QueueSignalAdapter {
    fn active_requests(&self) -> usize {
        self.0.stats().running
    }
    fn queued_requests(&self) -> usize {
        self.0.stats().queued
    }
}

struct RegisteredBackend {
    supervised: Arc<Supervised>,
    port: u16,
    supervisor_loop: JoinHandle<()>,
}

pub struct Orchestrator {
    config: OrchestratorConfig,
    models: RwLock<HashMap<String, ModelDescriptor>>,
    backends: tokio::sync::Mutex<HashMap<String, RegisteredBackend>>,
    port_pool: Arc<PortPool>,
    cache: Arc<ResponseCache>,
    queue: Arc<RequestQueue<InferenceJob, InferenceOutcome>>,
    degradation: Arc<DegradationManager>,
    power: Arc<PowerManager>,
    resource_probe: Arc<ResourceProbe>,
    audit: Arc<AuditLogger>,
    hash_db: StdMutex<HashDatabase>,
    backend_client: Arc<BackendClient>,
    background: StdMutex<Vec<JoinHandle<()>>>,
    degradation_handle: StdMutex<Option<DegradationHandle>>,
    power_handle: StdMutex<Option<PowerHandle>>,
}

impl AdmissionContext for Orchestrator {
    fn current_level(&self) -> DegradationLevel {
        self.degradation.current_level()
    }

    fn available_memory_mb(&self) -> u64 {
        let snapshot = self.resource_probe.snapshot();
        snapshot.mem_total_bytes.saturating_sub(snapshot.mem_used_bytes) / (1024 * 1024)
    }
}

impl Orchestrator {
    /// Builds every collaborator but does not yet start background tasks —
    /// see `start` (§4.8 "On startup").
    pub fn new(config: OrchestratorConfig, models: HashMap<String, ModelDescriptor>) -> Result<Arc<Self>, AppError> {
        let audit = AuditLogger::init(config.audit_dir(), AuditConfig { max_file_size_bytes: config.audit_max_file_size_bytes })?;
        let hash_db = HashDatabase::load(config.hash_store_path());

        let cache = Arc::new(ResponseCache::new(CacheConfig {
            capacity: config.cache_capacity,
            base_ttl: config.cache_ttl,
            cleanup_interval: config.cache_cleanup_interval,
        }));

        let queue = RequestQueue::new(aegis_core_queue::QueueConfig {
            max_concurrent: config.queue_max_concurrent,
            max_queue_size: config.queue_max_size,
            memory_threshold_mb: config.queue_memory_threshold_mb,
            queue_timeout: config.queue_timeout,
        });

        let degradation = Arc::new(DegradationManager::new(DegradationConfig {
            tick_interval: config.degradation_tick_interval,
            recovery_delay: config.degradation_recovery_delay,
        }));

        let power = Arc::new(PowerManager::new(PowerConfig {
            poll_interval: config.power_poll_interval,
            ..PowerConfig::default()
        }));

        let resource_probe = Arc::new(ResourceProbe::new(config.data_dir.clone()));
        let port_pool = Arc::new(PortPool::new(config.backend_port_range.0..=config.backend_port_range.1));

        Ok(Arc::new(Self {
            config,
            models: RwLock::new(models),
            backends: tokio::sync::Mutex::new(HashMap::new()),
            port_pool,
            cache,
            queue,
            degradation,
            power,
            resource_probe,
            audit: Arc::new(audit),
            hash_db: StdMutex::new(hash_db),
            backend_client: Arc::new(BackendClient::new()),
            background: StdMutex::new(Vec::new()),
            degradation_handle: StdMutex::new(None),
            power_handle: StdMutex::new(None),
        }))
    }

    /// Spawns every long-lived background task: the queue dispatcher, the
    /// degradation ticker, the power poller, and the cache sweep (§4.8,
    /// §5 "Coroutines" — everything is bound to the Orchestrator's lifetime).
    pub fn start(self: &Arc<Self>) {
        let process_fn = self.process_fn();
        let dispatcher = spawn_dispatcher(Arc::clone(&self.queue), process_fn);
        self.background.lock().expect("background handle lock poisoned").push(dispatcher);

        let cleanup = spawn_cleanup_task(Arc::clone(&self.cache), self.config.cache_cleanup_interval);
        self.background.lock().expect("background handle lock poisoned").push(cleanup);

        let queue_signal: Arc<dyn QueueSignal> = Arc::new(QueueSignalAdapter(Arc::clone(&self.queue)));
        let degradation_handle = Arc::clone(&self.degradation).start(Arc::clone(&self.resource_probe), queue_signal);
        *self.degradation_handle.lock().expect("degradation handle lock poisoned") = Some(degradation_handle);

        let power_handle = Arc::clone(&self.power).start(Arc::new(SysfsPowerSource));
        *self.power_handle.lock().expect("power handle lock poisoned") = Some(power_handle);

        self.spawn_level_watcher();
        info!(target: "orchestrator", "background services online");
    }

    /// Adjusts queue concurrency whenever the degradation level changes,
    /// taking the minimum with the power manager's cap (§4.6).
    fn spawn_level_watcher(self: &Arc<Self>) {
        let orchestrator = Arc::clone(self);
        let mut levels = orchestrator.degradation.subscribe();
        let handle = tokio::spawn(async move {
            loop {
                let level = *levels.borrow_and_update();
                let cap = level.policy().max_concurrent.min(orchestrator.power.max_concurrent());
                orchestrator.queue.update_concurrency(cap.max(1));
                if levels.changed().await.is_err() {
                    break;
                }
            }
        });
        self.background.lock().expect("background handle lock poisoned").push(handle);
    }

    fn process_fn(self: &Arc<Self>) -> ProcessFn<InferenceJob, InferenceOutcome> {
        let orchestrator = Arc::clone(self);
        Arc::new(move |job: InferenceJob, remaining: Duration| -> BoxFuture<Result<InferenceOutcome, AppError>> {
            let orchestrator = Arc::clone(&orchestrator);
            Box::pin(async move { orchestrator.process_job(job, remaining).await })
        })
    }

    async fn process_job(self: Arc<Self>, job: InferenceJob, remaining: Duration) -> Result<InferenceOutcome, AppError> {
        let port = self.ensure_loaded(&job.model_id).await?;

        let request = CompletionRequest {
            prompt: job.prompt.clone(),
            params: job.params.clone(),
            max_tokens: job.max_tokens,
            stream: job.stream,
        };

        if job.stream {
            let mut client_stream = self
                .backend_client
                .stream_complete(port, &request, remaining)
                .await
                .map_err(AppError::from)?;

            let (tx, rx) = mpsc::channel(32);
            tokio::spawn(async move {
                use tokio_stream::StreamExt;
                while let Some(item) = client_stream.next().await {
                    if tx.send(item.map_err(AppError::from)).await.is_err() {
                        break;
                    }
                }
            });
            self.emit_audit(&job, true, None);
            return Ok(InferenceOutcome::Stream(rx));
        }

        match self.backend_client.complete(port, &request, remaining).await {
            Ok(result) => {
                if Self::is_deterministic(&job.params) {
                    let ttl = self.config.cache_ttl.mul_f64(self.degradation.current_level().cache_ttl_factor());
                    let params: Vec<(&str, &str)> = job.params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
                    self.cache.set_with_ttl(&job.model_id, &job.prompt, &params, result.text.clone(), ttl);
                }
                self.emit_audit(&job, true, None);
                Ok(InferenceOutcome::Complete { text: result.text, usage: result.usage })
            }
            Err(err) => {
                let app_err: AppError = err.into();
                self.emit_audit(&job, false, Some(app_err.message.clone()));
                Err(app_err)
            }
        }
    }

    /// A result is safe to cache only when the caller pinned determinism —
    /// `temperature=0` or an explicit `cache=true` opt-in (§4.8).
    fn is_deterministic(params: &[(String, String)]) -> bool {
        params.iter().any(|(k, v)| k == "temperature" && v == "0")
            || params.iter().any(|(k, v)| k == "cache" && v == "true")
    }

    fn emit_audit(&self, job: &InferenceJob, success: bool, error: Option<String>) {
        let audit = Arc::clone(&self.audit);
        let mut draft = AuditDraft::new(AuditKind::query(), "submit")
            .detail("model", job.model_id.clone())
            .detail("stream", job.stream);
        if !success {
            draft = draft.failed(error.unwrap_or_else(|| "inference failed".to_string()));
        }
        tokio::task::spawn_blocking(move || {
            if let Err(e) = audit.append(draft) {
                warn!(target: "orchestrator", "failed to append audit event: {e}");
            }
        });
    }

    /// `Submit` (§6): synchronous, cancellation-aware.
    pub async fn submit(
        &self,
        model_id: &str,
        prompt: &str,
        params: Vec<(String, String)>,
        priority: Priority,
    ) -> Result<(String, Usage), AppError> {
        if !self.model_exists(model_id) {
            return Err(AppError::not_found(format!("unknown model: {model_id}")));
        }

        let param_refs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
        if let Some(cached) = self.cache.get(model_id, prompt, &param_refs) {
            return Ok((cached, Usage::default()));
        }

        let job = InferenceJob {
            model_id: model_id.to_string(),
            prompt: prompt.to_string(),
            params,
            max_tokens: self.current_max_output(),
            stream: false,
        };

        match self.queue.enqueue(job, priority, self).await? {
            InferenceOutcome::Complete { text, usage } => Ok((text, usage)),
            InferenceOutcome::Stream(_) => Err(AppError::internal("process function returned a stream for a non-streaming submit")),
        }
    }

    /// `SubmitStream` (§6): a lazy, finite sequence of text deltas.
    pub async fn submit_stream(
        &self,
        model_id: &str,
        prompt: &str,
        params: Vec<(String, String)>,
        priority: Priority,
    ) -> Result<mpsc::Receiver<Result<String, AppError>>, AppError> {
        if !self.model_exists(model_id) {
            return Err(AppError::not_found(format!("unknown model: {model_id}")));
        }

        let job = InferenceJob {
            model_id: model_id.to_string(),
            prompt: prompt.to_string(),
            params,
            max_tokens: self.current_max_output(),
            stream: true,
        };

        match self.queue.enqueue(job, priority, self).await? {
            InferenceOutcome::Stream(rx) => Ok(rx),
            InferenceOutcome::Complete { .. } => Err(AppError::internal("process function returned a completion for a streaming submit")),
        }
    }

    pub fn current_degradation_level(&self) -> DegradationLevel {
        self.degradation.current_level()
    }

    fn current_max_output(&self) -> u32 {
        self.degradation.current_level().policy().max_output.min(self.power.max_context())
    }

    pub fn list_models(&self) -> Vec<ModelDescriptor> {
        self.models.read().expect("models lock poisoned").values().cloned().collect()
    }

    pub fn model_exists(&self, model_id: &str) -> bool {
        self.models.read().expect("models lock poisoned").contains_key(model_id)
    }

    /// `EnsureLoaded` (§6): starts the backend for `model_id` if not already
    /// running, waits for it to report healthy, and returns its loopback port.
    pub async fn ensure_loaded(&self, model_id: &str) -> Result<u16, AppError> {
        let descriptor = {
            let models = self.models.read().expect("models lock poisoned");
            models.get(model_id).cloned()
        }
        .ok_or_else(|| AppError::not_found(format!("unknown model: {model_id}")))?;

        let mut backends = self.backends.lock().await;
        if let Some(existing) = backends.get(model_id) {
            let port = existing.port;
            let supervised = Arc::clone(&existing.supervised);
            drop(backends);
            return self.await_healthy(&supervised, port).await;
        }

        let port = self.port_pool.acquire().map_err(|_| AppError::resource_exhausted("no free backend ports remain"))?;

        let process_config = ProcessConfig::new(model_id, self.config.backend_command.as_str(), port).args(vec![
            "--model".to_string(),
            descriptor.path.clone(),
            "--port".to_string(),
            port.to_string(),
            "--ctx-size".to_string(),
            descriptor.context_window.to_string(),
        ]);

        let on_transition: aegis_core_watchdog::TransitionCallback = Arc::new(|name, state| {
            tracing::info!(target: "orchestrator", backend = %name, ?state, "backend transition");
        });

        let supervised = Arc::new(Supervised::new(process_config, Some(on_transition)));
        supervised.start().await?;
        let supervisor_loop = aegis_core_watchdog::spawn_supervisor_loop(Arc::clone(&supervised));

        backends.insert(
            model_id.to_string(),
            RegisteredBackend { supervised: Arc::clone(&supervised), port, supervisor_loop },
        );
        drop(backends);

        self.await_healthy(&supervised, port).await
    }

    async fn await_healthy(&self, supervised: &Arc<Supervised>, port: u16) -> Result<u16, AppError> {
        for _ in 0..60 {
            let status = supervised.status().await;
            match status.state {
                BackendState::Running => return Ok(port),
                BackendState::Failed => {
                    return Err(AppError::unhealthy(format!(
                        "backend {} failed to start: {}",
                        status.model_id,
                        status.last_error.unwrap_or_default()
                    )))
                }
                _ => tokio::time::sleep(Duration::from_millis(500)).await,
            }
        }
        Err(AppError::timeout("backend did not become healthy in time"))
    }

    /// `Status` (§6).
    pub async fn status(&self) -> OrchestratorStatus {
        let backends = self.backends.lock().await;
        let mut statuses = Vec::with_capacity(backends.len());
        for backend in backends.values() {
            statuses.push(backend.supervised.status().await);
        }

        let snapshot = self.queue.stats();
        OrchestratorStatus {
            level: self.degradation.current_level(),
            power: self.power.current(),
            queue: QueueStatusView {
                queued: snapshot.queued,
                running: snapshot.running,
                completed_ok: snapshot.completed_ok,
                completed_error: snapshot.completed_error,
                rejected: snapshot.rejected,
                average_wait_micros: snapshot.average_wait_micros,
                average_run_micros: snapshot.average_run_micros,
            },
            backends: statuses,
        }
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache_capacity(&self) -> usize {
        self.config.cache_capacity
    }

    pub fn cache_ttl_seconds(&self) -> u64 {
        self.config.cache_ttl.as_secs()
    }

    pub fn audit_query(&self, query: &AuditQuery) -> Result<AuditPage, AppError> {
        aegis_core_audit::query_dir(&self.config.audit_dir(), query)
    }

    pub fn verify_model(&self, model_id: &str) -> Result<VerifyResult, AppError> {
        let descriptor = {
            let models = self.models.read().expect("models lock poisoned");
            models.get(model_id).cloned()
        }
        .ok_or_else(|| AppError::not_found(format!("unknown model: {model_id}")))?;

        let hash_db = self.hash_db.lock().expect("hash db lock poisoned");
        aegis_core_integrity::verify_file(&PathBuf::from(&descriptor.path), &hash_db)
            .map_err(|e| AppError::integrity_failure(format!("failed to verify {model_id}: {e}")))
    }

    pub fn quick_check_model(&self, model_id: &str) -> Result<bool, AppError> {
        let descriptor = {
            let models = self.models.read().expect("models lock poisoned");
            models.get(model_id).cloned()
        }
        .ok_or_else(|| AppError::not_found(format!("unknown model: {model_id}")))?;

        let hash_db = self.hash_db.lock().expect("hash db lock poisoned");
        quick_check(&PathBuf::from(&descriptor.path), &hash_db)
            .map_err(|e| AppError::internal(format!("failed to stat {model_id}: {e}")))
    }

    /// Graceful shutdown (§4.8, §9 Supplemented Features: queue drains,
    /// then every backend stops, then the audit logger is given its final
    /// word — matching Testable Property 13's ordering).
    pub async fn shutdown(&self, graceful_timeout: Duration) {
        // Stop admitting and cancel every queued/in-flight entry first, so
        // each caller unblocks with `Canceled` well inside `graceful_timeout`
        // instead of riding out to the queue's own (much longer) timeout or
        // whatever a torn-down backend happens to return.
        self.queue.begin_shutdown();

        if let Some(handle) = self.degradation_handle.lock().expect("degradation handle lock poisoned").take() {
            handle.abort();
        }
        if let Some(handle) = self.power_handle.lock().expect("power handle lock poisoned").take() {
            handle.abort();
        }

        let backends: Vec<_> = {
            let mut backends = self.backends.lock().await;
            backends.drain().collect()
        };
        for (name, backend) in backends {
            if tokio::time::timeout(graceful_timeout, backend.supervised.stop()).await.is_err() {
                warn!(target: "orchestrator", backend = %name, "graceful stop exceeded timeout");
            }
            backend.supervisor_loop.abort();
            self.port_pool.release(backend.port);
        }

        for handle in self.background.lock().expect("background handle lock poisoned").drain(..) {
            handle.abort();
        }

        info!(target: "orchestrator", "shutdown sequence complete");
    }
}
