// Posit Pro Drivers: ODBC drivers for common databases, registered with unixODBC.

use crate::errors::WbiError;
use crate::installers::{Installer, InstallerInfo};
use crate::libs::os::{OperatingSystem, PackageKind};
use crate::libs::paths::{ODBCINST_INI, PRO_DRIVERS_SAMPLE_INI};
use crate::{log_info, log_warn};
use anyhow::Context;
use colored::Colorize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

const PRO_DRIVERS_VERSION: &str = "2023.05.0";
const DRIVERS_BASE: &str = "https://cdn.rstudio.com/drivers/7C152C12/installer";

pub fn installer_info(os: OperatingSystem) -> InstallerInfo {
    let name = match os.package_kind() {
        PackageKind::Deb => format!("rstudio-drivers_{PRO_DRIVERS_VERSION}_amd64.deb"),
        PackageKind::Rpm => format!("rstudio-drivers-{PRO_DRIVERS_VERSION}-1.el.x86_64.rpm"),
    };
    InstallerInfo {
        url: format!("{DRIVERS_BASE}/{name}"),
        name,
        version: PRO_DRIVERS_VERSION.to_string(),
    }
}

/// unixODBC packages the drivers depend on.
pub fn unixodbc_command(os: OperatingSystem) -> &'static str {
    match os.package_kind() {
        PackageKind::Deb => "apt-get install -y unixodbc unixodbc-dev",
        PackageKind::Rpm => "yum install -y unixODBC unixODBC-devel",
    }
}

/// Whether the sample driver definitions were already appended to `odbcinst.ini`.
pub fn drivers_registered(odbcinst: &Path) -> Result<bool, WbiError> {
    match fs::read_to_string(odbcinst) {
        Ok(contents) => Ok(contents.contains("/opt/rstudio-drivers")),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(WbiError::io("reading", odbcinst, e)),
    }
}

pub fn install(installer: &mut Installer) -> anyhow::Result<()> {
    let os = installer.os();
    installer.ensure_prerequisites()?;
    installer
        .executor()
        .run(unixodbc_command(os), true)
        .context("installing unixODBC")?;

    let info = installer_info(os);
    installer.install_package(&info).context("installing Pro Drivers")?;

    if drivers_registered(Path::new(ODBCINST_INI))? {
        log_warn!("Pro Drivers are already registered in {}, skipping", ODBCINST_INI);
    } else {
        installer
            .executor()
            .run(
                &format!("cat {PRO_DRIVERS_SAMPLE_INI} | tee -a {ODBCINST_INI} > /dev/null"),
                true,
            )
            .context("registering Pro Drivers with unixODBC")?;
    }

    log_info!("Pro Drivers {} successfully installed", info.version.green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_name_follows_the_distro() {
        assert_eq!(
            installer_info(OperatingSystem::Ubuntu22).url,
            "https://cdn.rstudio.com/drivers/7C152C12/installer/rstudio-drivers_2023.05.0_amd64.deb"
        );
        assert_eq!(
            installer_info(OperatingSystem::Rhel8).name,
            "rstudio-drivers-2023.05.0-1.el.x86_64.rpm"
        );
    }

    #[test]
    fn registration_is_detected_from_driver_paths() {
        let dir = tempfile::tempdir().unwrap();
        let ini = dir.path().join("odbcinst.ini");
        assert!(!drivers_registered(&ini).unwrap());

        fs::write(&ini, "[PostgreSQL]\nDriver = /usr/lib/psqlodbcw.so\n").unwrap();
        assert!(!drivers_registered(&ini).unwrap());

        fs::write(&ini, "[Snowflake]\nDriver = /opt/rstudio-drivers/snowflake/bin/lib/libsnowflake.so\n").unwrap();
        assert!(drivers_registered(&ini).unwrap());
    }
}
