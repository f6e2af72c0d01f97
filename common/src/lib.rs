
pub mod error;
pub mod weather;

pub use error::StationError;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Convenience helper for capturing what a display renders. Every clone writes into the same
/// buffer, so one handle can be given to a display while another reads the lines back.
#[derive(Clone, Debug, Default)]
pub struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    /// Everything written so far, lossily decoded as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    /// The written text split into lines, without line terminators.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    /// Drops everything written so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_shared_output_clones_share_buffer() {
    let output = SharedOutput::default();
    let mut writer = output.clone();

    writeln!(writer, "first").unwrap();
    writeln!(writer, "second").unwrap();

    assert_eq!(output.lines(), vec!["first", "second"]);

    output.clear();
    assert!(output.contents().is_empty());
}
