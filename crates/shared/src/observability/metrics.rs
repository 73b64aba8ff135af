//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集。
//! 只安装 recorder，指标文本由调用方通过 [`MetricsHandle::render`] 暴露。

use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::{Mutex, OnceLock};

/// 全局 Prometheus handle，用于渲染指标
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Metrics 资源句柄
#[derive(Clone)]
pub struct MetricsHandle {
    handle: PrometheusHandle,
}

impl MetricsHandle {
    /// 渲染 Prometheus 文本格式
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// 串行化首次安装，避免并发调用重复安装 recorder
static INSTALL_LOCK: Mutex<()> = Mutex::new(());

/// 初始化 Prometheus recorder
///
/// 全局 recorder 只能安装一次，重复或并发调用复用第一次的 handle。
pub fn init(service_name: &str) -> Result<MetricsHandle> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(MetricsHandle {
            handle: handle.clone(),
        });
    }

    let _guard = INSTALL_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(MetricsHandle {
            handle: handle.clone(),
        });
    }

    let handle = PrometheusBuilder::new().install_recorder()?;
    let handle = PROMETHEUS_HANDLE.get_or_init(|| handle).clone();

    register_common_metrics(service_name);

    Ok(MetricsHandle { handle })
}

/// 注册业务指标描述，出现在 /metrics 的 HELP 注释中
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!(
        "code_verifications_total",
        "Total number of code verification attempts by result"
    );
    metrics::describe_histogram!(
        "code_verification_duration_seconds",
        "Code verification duration in seconds"
    );
    metrics::describe_counter!("code_imports_total", "Total number of batch imports");
    metrics::describe_counter!("codes_imported_total", "Total number of codes inserted");
    metrics::describe_counter!(
        "codes_skipped_total",
        "Total number of import rows skipped by reason"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 记录一次核验结果
///
/// result 取值：verified / rejected / invalid / error
pub fn record_verification(result: &'static str, duration_secs: f64) {
    metrics::counter!("code_verifications_total", "result" => result).increment(1);
    metrics::histogram!("code_verification_duration_seconds").record(duration_secs);
}

/// 记录一次批次导入
pub fn record_import(inserted: u64, duplicates: u64, unparseable: u64, failed: u64) {
    metrics::counter!("code_imports_total").increment(1);
    metrics::counter!("codes_imported_total").increment(inserted);
    metrics::counter!("codes_skipped_total", "reason" => "duplicate").increment(duplicates);
    metrics::counter!("codes_skipped_total", "reason" => "unparseable").increment(unparseable);
    metrics::counter!("codes_skipped_total", "reason" => "error").increment(failed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent_and_renders_counters() {
        let first = init("test-service").unwrap();
        let second = init("test-service").unwrap();

        record_verification("verified", 0.01);
        record_import(2, 1, 0, 0);

        let rendered = second.render();
        assert!(rendered.contains("code_verifications_total"));
        assert!(rendered.contains("codes_imported_total"));
        assert_eq!(first.render().is_empty(), rendered.is_empty());
        assert!(PROMETHEUS_HANDLE.get().is_some());
    }

    #[test]
    fn test_concurrent_init_installs_once() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| init("test-service").is_ok()))
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
        assert!(PROMETHEUS_HANDLE.get().is_some());
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        // 未安装 recorder 时 metrics 宏不会 panic
        record_verification("error", 0.5);
    }
}
