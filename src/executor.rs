//! The boundary seam to the browser automation session.

use std::future::Future;

use serde_json::Value;

use crate::error::Result;

/// Script-execution capability of a browser session.
///
/// This is the only call that crosses the process boundary. Everything else
/// in the crate assembles script text or reshapes the returned JSON, so any
/// type that can run a script against a browser can stand in for a live
/// WebDriver session.
pub trait ScriptExecutor {
    /// Runs `script` in the browser with `args` bound to the script's
    /// `arguments[N]` slots and returns the JSON-decoded result.
    fn execute_script(
        &self,
        script: &str,
        args: Vec<Value>,
    ) -> impl Future<Output = Result<Value>> + Send;
}

impl ScriptExecutor for fantoccini::Client {
    async fn execute_script(&self, script: &str, args: Vec<Value>) -> Result<Value> {
        Ok(self.execute(script, args).await?)
    }
}
