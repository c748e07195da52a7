use std::thread;

use sysinfo::{Disks, Pid, Process, System, Users, MINIMUM_CPU_UPDATE_INTERVAL};

use super::has_flag;
use crate::command::{Command, CommandContext, Output};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

pub struct Echo;

impl Command for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Display a line of text"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        Output::Text(args.join(" "))
    }
}

/// CPU figures need two samples; take the second after the minimum interval.
fn sampled_system() -> System {
    let mut sys = System::new_all();
    thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
    sys.refresh_all();
    sys
}

fn memory_percent(process: &Process, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        process.memory() as f64 * 100.0 / total as f64
    }
}

fn process_name(process: &Process) -> String {
    process.name().to_string_lossy().into_owned()
}

pub struct Ps;

impl Command for Ps {
    fn name(&self) -> &str {
        "ps"
    }

    fn description(&self) -> &str {
        "Report process status"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let show_all = has_flag(args, &["-a", "--all"]);
        let sys = System::new_all();
        let total = sys.total_memory();
        let me = sysinfo::get_current_pid()
            .ok()
            .and_then(|pid| sys.process(pid))
            .and_then(|p| p.user_id().cloned());

        let mut procs: Vec<(&Pid, &Process)> = sys
            .processes()
            .iter()
            .filter(|(_, p)| show_all || me.is_none() || p.user_id() == me.as_ref())
            .collect();
        procs.sort_by_key(|(pid, _)| pid.as_u32());

        let mut lines = vec!["PID\tCPU%\tMEM%\tCOMMAND".to_string()];
        lines.extend(procs.into_iter().map(|(pid, p)| {
            format!(
                "{}\t{:.1}\t{:.1}\t{}",
                pid.as_u32(),
                p.cpu_usage(),
                memory_percent(p, total),
                process_name(p)
            )
        }));
        Output::Text(lines.join("\n"))
    }
}

pub struct Top;

impl Command for Top {
    fn name(&self) -> &str {
        "top"
    }

    fn description(&self) -> &str {
        "Display system resource usage and processes"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, _args: &[String]) -> Output {
        let sys = sampled_system();
        let users = Users::new_with_refreshed_list();

        let cpus = sys.cpus();
        let cpu = if cpus.is_empty() {
            0.0
        } else {
            cpus.iter().map(|c| c.cpu_usage()).sum::<f32>() / cpus.len() as f32
        };
        let percent = |used: u64, total: u64| {
            if total == 0 {
                0.0
            } else {
                used as f64 * 100.0 / total as f64
            }
        };
        let (mem_used, mem_total) = (sys.used_memory(), sys.total_memory());
        let (swap_used, swap_total) = (sys.used_swap(), sys.total_swap());

        let mut out = vec![
            format!("CPU Usage: {cpu:.1}%"),
            format!(
                "Memory: {:.1}% used ({:.1}GB / {:.1}GB)",
                percent(mem_used, mem_total),
                mem_used as f64 / GIB,
                mem_total as f64 / GIB
            ),
            format!(
                "Swap: {:.1}% used ({:.1}GB / {:.1}GB)",
                percent(swap_used, swap_total),
                swap_used as f64 / GIB,
                swap_total as f64 / GIB
            ),
            String::new(),
            "PID     USER       CPU%  MEM%  COMMAND".to_string(),
        ];

        let mut procs: Vec<(&Pid, &Process)> = sys.processes().iter().collect();
        procs.sort_by(|a, b| b.1.cpu_usage().total_cmp(&a.1.cpu_usage()));
        for (pid, p) in procs.into_iter().take(10) {
            let user = p
                .user_id()
                .and_then(|uid| users.get_user_by_id(uid))
                .map(|u| u.name().to_string())
                .unwrap_or_else(|| "?".to_string());
            out.push(format!(
                "{:5} {:10} {:5.1} {:5.1} {}",
                pid.as_u32(),
                user,
                p.cpu_usage(),
                memory_percent(p, mem_total),
                process_name(p)
            ));
        }
        Output::Text(out.join("\n"))
    }
}

pub struct Df;

/// `1536` → `1.5K`.
fn human_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "K", "M", "G", "T"] {
        if size < 1024.0 {
            return format!("{size:.1}{unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1}P")
}

impl Command for Df {
    fn name(&self) -> &str {
        "df"
    }

    fn description(&self) -> &str {
        "Report file system disk space usage"
    }

    fn execute(&self, _ctx: &mut CommandContext<'_>, args: &[String]) -> Output {
        let human = has_flag(args, &["-h", "--human-readable"]);
        let fmt = |bytes: u64| {
            if human {
                human_size(bytes)
            } else {
                bytes.to_string()
            }
        };

        let disks = Disks::new_with_refreshed_list();
        let mut lines = vec!["Filesystem\tSize\tUsed\tAvail\tUse%\tMounted on".to_string()];
        for disk in disks.list() {
            let total = disk.total_space();
            let avail = disk.available_space();
            let used = total.saturating_sub(avail);
            let pct = if total == 0 {
                0.0
            } else {
                used as f64 * 100.0 / total as f64
            };
            lines.push(format!(
                "{}\t{}\t{}\t{}\t{pct:.1}%\t{}",
                disk.name().to_string_lossy(),
                fmt(total),
                fmt(used),
                fmt(avail),
                disk.mount_point().display()
            ));
        }
        Output::Text(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Session, Shell};

    #[test]
    fn human_sizes_scale_by_1024() {
        assert_eq!(human_size(512), "512.0B");
        assert_eq!(human_size(1536), "1.5K");
        assert_eq!(human_size(3 * 1024 * 1024 * 1024), "3.0G");
    }

    #[test]
    fn echo_joins_arguments() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        assert_eq!(
            shell.execute_line(&mut session, "echo hello   'big world'"),
            Output::text("hello big world")
        );
    }

    #[test]
    fn ps_and_df_print_headers() {
        let shell = Shell::with_builtins();
        let mut session = Session::new("/");
        let ps = shell.execute_line(&mut session, "ps");
        assert!(ps.as_text().is_some_and(|t| t.starts_with("PID\tCPU%")));
        let df = shell.execute_line(&mut session, "df -h");
        assert!(df.as_text().is_some_and(|t| t.starts_with("Filesystem\t")));
    }
}
