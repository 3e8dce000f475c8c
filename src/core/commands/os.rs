use std::io::Write;
use std::str::FromStr;

use sysinfo::System;

use super::CommandError;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFlag {
    Eol,
    Cpus,
    HomeDir,
    Username,
    Architecture,
}

impl FromStr for OsFlag {
    type Err = CommandError;

    fn from_str(flag: &str) -> Result<Self, Self::Err> {
        match flag {
            "--EOL" => Ok(OsFlag::Eol),
            "--cpus" => Ok(OsFlag::Cpus),
            "--homedir" => Ok(OsFlag::HomeDir),
            "--username" => Ok(OsFlag::Username),
            "--architecture" => Ok(OsFlag::Architecture),
            other => Err(CommandError::UnknownFlag(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) struct CpuInfo {
    pub model: String,
    pub mhz: u64,
}

pub(super) fn report(flag: OsFlag, out: &mut dyn Write) -> Result<(), CommandError> {
    match flag {
        OsFlag::Eol => writeln!(out, "{LINE_ENDING:?}")?,
        OsFlag::Cpus => write_cpus(&cpus(), out)?,
        OsFlag::HomeDir => {
            let home = dirs::home_dir().ok_or(CommandError::Unavailable("home directory"))?;
            writeln!(out, "{}", home.display())?;
        }
        OsFlag::Username => {
            let name = os_username().ok_or(CommandError::Unavailable("user name"))?;
            writeln!(out, "{name}")?;
        }
        OsFlag::Architecture => writeln!(out, "{}", std::env::consts::ARCH)?,
    }
    Ok(())
}

fn cpus() -> Vec<CpuInfo> {
    let mut system = System::new();
    system.refresh_cpu_all();
    system
        .cpus()
        .iter()
        .map(|cpu| CpuInfo {
            model: cpu.brand().trim().to_string(),
            mhz: cpu.frequency(),
        })
        .collect()
}

fn write_cpus(cpus: &[CpuInfo], out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "Amount: {}", cpus.len())?;
    for (index, cpu) in cpus.iter().enumerate() {
        writeln!(
            out,
            "num: {}, model: {}, clock rate: {:.2} GHz",
            index + 1,
            cpu.model,
            cpu.mhz as f64 / 1000.0
        )?;
    }
    Ok(())
}

fn os_username() -> Option<String> {
    account_name()
        .or_else(|| std::env::var("USER").ok())
        .or_else(|| std::env::var("USERNAME").ok())
        .filter(|name| !name.is_empty())
}

#[cfg(unix)]
fn account_name() -> Option<String> {
    use std::ffi::CStr;

    // SAFETY: getpwuid returns null or a pointer to static storage; the name is
    // copied out before anything else can overwrite it.
    unsafe {
        let passwd = libc::getpwuid(libc::getuid());
        if passwd.is_null() || (*passwd).pw_name.is_null() {
            return None;
        }
        CStr::from_ptr((*passwd).pw_name)
            .to_str()
            .ok()
            .map(str::to_owned)
    }
}

#[cfg(not(unix))]
fn account_name() -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(flag: OsFlag) -> Result<String, Box<dyn std::error::Error>> {
        let mut out = Vec::new();
        report(flag, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_parse_flags() {
        assert_eq!("--EOL".parse::<OsFlag>().ok(), Some(OsFlag::Eol));
        assert_eq!("--architecture".parse::<OsFlag>().ok(), Some(OsFlag::Architecture));
        assert!(matches!(
            "--eol".parse::<OsFlag>(),
            Err(CommandError::UnknownFlag(_))
        ));
        assert!("cpus".parse::<OsFlag>().is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_eol_is_quoted() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(render(OsFlag::Eol)?, "\"\\n\"\n");
        Ok(())
    }

    #[test]
    fn test_architecture() -> Result<(), Box<dyn std::error::Error>> {
        assert_eq!(render(OsFlag::Architecture)?.trim(), std::env::consts::ARCH);
        Ok(())
    }

    #[test]
    fn test_cpu_lines() -> Result<(), Box<dyn std::error::Error>> {
        let cpus = vec![
            CpuInfo {
                model: "Test CPU".to_string(),
                mhz: 2400,
            },
            CpuInfo {
                model: "Test CPU".to_string(),
                mhz: 3130,
            },
        ];
        let mut out = Vec::new();

        write_cpus(&cpus, &mut out)?;

        assert_eq!(
            String::from_utf8(out)?,
            "Amount: 2\n\
             num: 1, model: Test CPU, clock rate: 2.40 GHz\n\
             num: 2, model: Test CPU, clock rate: 3.13 GHz\n"
        );
        Ok(())
    }

    #[test]
    fn test_cpus_reports_amount() -> Result<(), Box<dyn std::error::Error>> {
        let text = render(OsFlag::Cpus)?;
        assert!(text.starts_with("Amount: "));
        Ok(())
    }
}
