use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::store::{GenerationPatch, GenerationStatus, Stores};

/// 幻灯片生成的后台执行器
///
/// 每个任务一个tokio task，驱动 pending → in_progress → completed 状态机；
/// 保留JoinHandle以支持中途取消（取消的任务记为failed）。进程重启会丢掉
/// 未完成的任务，记录停留在原状态并原样出现在管理端列表里
#[derive(Default)]
pub struct DeckWorker {
    jobs: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl DeckWorker {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> std::sync::MutexGuard<'_, HashMap<String, JoinHandle<()>>> {
        self.jobs.lock().expect("deck worker lock poisoned")
    }

    /// 派发一个生成任务
    ///
    /// 立即标记为in_progress，等待渲染延迟后写入completed和幻灯片URL。
    /// 真实渲染器尚未接入，延迟期即是渲染的占位
    pub fn dispatch(
        self: &Arc<Self>,
        stores: Arc<Stores>,
        generation_id: String,
        render_delay: Duration,
        slides_base_url: String,
    ) {
        let worker = Arc::clone(self);
        let id = generation_id.clone();

        // 先持锁再spawn，任务结束时的句柄清理必须等注册完成
        let mut jobs = self.jobs();
        let handle = tokio::spawn(async move {
            if stores
                .generations
                .update(
                    &id,
                    GenerationPatch {
                        status: Some(GenerationStatus::InProgress),
                        slides_url: None,
                    },
                )
                .is_none()
            {
                tracing::warn!("Generation record disappeared before start: {}", id);
                worker.jobs().remove(&id);
                return;
            }

            tokio::time::sleep(render_delay).await;

            let slides_url = format!("{}/decks/{}.pdf", slides_base_url, id);
            match stores.generations.update(
                &id,
                GenerationPatch {
                    status: Some(GenerationStatus::Completed),
                    slides_url: Some(slides_url),
                },
            ) {
                Some(_) => tracing::info!("Deck generation completed: {}", id),
                None => tracing::warn!("Generation record disappeared mid-render: {}", id),
            }
            worker.jobs().remove(&id);
        });

        jobs.insert(generation_id, handle);
    }

    /// 取消在途任务并记为failed，没有在途任务时返回false
    pub fn cancel(&self, stores: &Stores, generation_id: &str) -> bool {
        let handle = match self.jobs().remove(generation_id) {
            Some(handle) => handle,
            None => return false,
        };
        handle.abort();

        stores.generations.update(
            generation_id,
            GenerationPatch {
                status: Some(GenerationStatus::Failed),
                slides_url: None,
            },
        );
        tracing::info!("Deck generation cancelled: {}", generation_id);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GenerationDraft, PeriodType};

    fn pending_generation(stores: &Stores) -> String {
        stores
            .generations
            .create(GenerationDraft {
                generated_by: "admin@x.com".to_string(),
                period_type: PeriodType::Weekly,
                period_start: "2025-01-06".parse().unwrap(),
                status: GenerationStatus::Pending,
            })
            .id
    }

    #[tokio::test]
    async fn dispatch_runs_the_full_state_machine() {
        let stores = Arc::new(Stores::new());
        let worker = Arc::new(DeckWorker::new());
        let id = pending_generation(&stores);

        worker.dispatch(
            Arc::clone(&stores),
            id.clone(),
            Duration::from_millis(20),
            "https://decks.internal".to_string(),
        );

        tokio::time::sleep(Duration::from_millis(5)).await;
        assert_eq!(
            stores.generations.get(&id).unwrap().status,
            GenerationStatus::InProgress
        );

        tokio::time::sleep(Duration::from_millis(100)).await;
        let done = stores.generations.get(&id).unwrap();
        assert_eq!(done.status, GenerationStatus::Completed);
        assert_eq!(
            done.slides_url.as_deref(),
            Some(format!("https://decks.internal/decks/{}.pdf", id).as_str())
        );
        // 完成后句柄已清理，再取消应返回false
        assert!(!worker.cancel(&stores, &id));
    }

    #[tokio::test]
    async fn cancel_marks_the_record_failed() {
        let stores = Arc::new(Stores::new());
        let worker = Arc::new(DeckWorker::new());
        let id = pending_generation(&stores);

        worker.dispatch(
            Arc::clone(&stores),
            id.clone(),
            Duration::from_secs(60),
            "https://decks.internal".to_string(),
        );
        tokio::time::sleep(Duration::from_millis(5)).await;

        assert!(worker.cancel(&stores, &id));
        assert_eq!(
            stores.generations.get(&id).unwrap().status,
            GenerationStatus::Failed
        );
        assert!(stores.generations.get(&id).unwrap().slides_url.is_none());
    }

    #[tokio::test]
    async fn cancel_without_job_in_flight_is_rejected() {
        let stores = Stores::new();
        let worker = DeckWorker::new();
        assert!(!worker.cancel(&stores, "missing"));
    }
}
