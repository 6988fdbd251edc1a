//! Process CPU / memory reporting for `train --monitor`.

#[cfg(feature = "cli")]
mod imp {
    use std::sync::Mutex;
    use std::time::Instant;
    use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};

    /// 訓練階段的資源監控
    pub struct SystemMonitor {
        inner: Option<Sampler>,
    }

    struct Sampler {
        system: Mutex<System>,
        pid: Pid,
        started: Instant,
        peak_memory_mb: Mutex<u64>,
    }

    /// (cpu %, memory MB, peak memory MB)
    type Sample = (f32, u64, u64);

    impl Sampler {
        fn sample(&self) -> Option<Sample> {
            let mut system = self.system.lock().ok()?;
            system.refresh_processes_specifics(
                ProcessesToUpdate::Some(&[self.pid]),
                true,
                ProcessRefreshKind::everything(),
            );
            let process = system.process(self.pid)?;
            let memory_mb = process.memory() / 1024 / 1024;

            let mut peak = self.peak_memory_mb.lock().ok()?;
            *peak = (*peak).max(memory_mb);
            Some((process.cpu_usage(), memory_mb, *peak))
        }
    }

    impl SystemMonitor {
        pub fn new(enabled: bool) -> Self {
            if !enabled {
                return Self { inner: None };
            }

            let inner = match sysinfo::get_current_pid() {
                Ok(pid) => Some(Sampler {
                    system: Mutex::new(System::new()),
                    pid,
                    started: Instant::now(),
                    peak_memory_mb: Mutex::new(0),
                }),
                Err(e) => {
                    tracing::warn!("Unable to resolve current PID, monitoring disabled: {}", e);
                    None
                }
            };
            Self { inner }
        }

        pub fn is_enabled(&self) -> bool {
            self.inner.is_some()
        }

        pub fn log_stats(&self, stage: &str) {
            let Some(sampler) = &self.inner else { return };
            if let Some((cpu, memory_mb, peak_mb)) = sampler.sample() {
                tracing::info!(
                    "📊 {} - CPU: {:.1}%, Memory: {}MB, Peak: {}MB, Time: {:?}",
                    stage,
                    cpu,
                    memory_mb,
                    peak_mb,
                    sampler.started.elapsed()
                );
            }
        }

        pub fn log_final_stats(&self) {
            let Some(sampler) = &self.inner else { return };
            if let Some((_, _, peak_mb)) = sampler.sample() {
                tracing::info!(
                    "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                    sampler.started.elapsed(),
                    peak_mb
                );
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_disabled_monitor_does_nothing() {
            let monitor = SystemMonitor::new(false);
            assert!(!monitor.is_enabled());
            monitor.log_stats("stage");
            monitor.log_final_stats();
        }

        #[test]
        fn test_enabled_monitor_samples_own_process() {
            let monitor = SystemMonitor::new(true);
            assert!(monitor.is_enabled());
            let sampler = monitor.inner.as_ref().unwrap();
            let (_, memory_mb, peak_mb) = sampler.sample().unwrap();
            assert!(peak_mb >= memory_mb);
        }
    }
}

// 非 CLI 環境的空實作
#[cfg(not(feature = "cli"))]
mod imp {
    pub struct SystemMonitor;

    impl SystemMonitor {
        pub fn new(_enabled: bool) -> Self {
            Self
        }

        pub fn is_enabled(&self) -> bool {
            false
        }

        pub fn log_stats(&self, _stage: &str) {}

        pub fn log_final_stats(&self) {}
    }
}

pub use imp::SystemMonitor;
