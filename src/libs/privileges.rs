use crate::errors::WbiError;
use nix::unistd::Uid;

/// Installing packages and writing under `/etc` needs root; fail early instead of halfway.
pub fn require_root() -> Result<(), WbiError> {
    if Uid::effective().is_root() {
        Ok(())
    } else {
        Err(WbiError::NotRoot)
    }
}
