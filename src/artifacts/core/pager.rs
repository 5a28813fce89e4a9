use crate::config::RepositoryConfig;
use derive_new::new;
use is_terminal::IsTerminal;
use minus::Pager;
use std::io::{self, Write};

/// `Write` adapter feeding a `minus` pager
///
/// Long command output (`log`, `global-log`) is written here instead of
/// stdout and shown once the command is done:
///
/// ```ignore
/// let pager = Pager::new();
/// let repository = Repository::new(path, Box::new(PagerWriter::new(pager.clone())), config)?;
/// repository.log()?;
/// minus::page_all(pager)?;
/// ```
#[derive(new)]
pub struct PagerWriter {
    pager: Pager,
}

impl Write for PagerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let text =
            std::str::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        self.pager.push_str(text).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Paging needs an interactive stdout and no `NO_PAGER` in the environment
pub fn should_page(config: &RepositoryConfig) -> bool {
    config.pager && io::stdout().is_terminal()
}
