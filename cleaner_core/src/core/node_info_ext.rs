//! Extension trait for `Option<&mut NodeInfo>` to simplify logging
//!
//! ```ignore
//! ctx.log_debug("message");  // Instead of if let Some(ref mut c) = ctx { c.log_debug(...) }
//! ```

use super::NodeInfo;

/// Extension trait for `Option<&mut NodeInfo>` enabling direct logging calls
pub trait NodeInfoExt {
    fn log_debug(&mut self, message: &str);

    fn log_info(&mut self, message: &str);

    /// Log a warning (counted in the node metrics when ctx is Some)
    fn log_warning(&mut self, message: &str);

    /// Log an error (counted in the node metrics when ctx is Some)
    fn log_error(&mut self, message: &str);
}

impl NodeInfoExt for Option<&mut NodeInfo> {
    #[inline]
    fn log_debug(&mut self, message: &str) {
        if let Some(ref mut ctx) = self {
            ctx.log_debug(message);
        }
    }

    #[inline]
    fn log_info(&mut self, message: &str) {
        if let Some(ref mut ctx) = self {
            ctx.log_info(message);
        }
    }

    #[inline]
    fn log_warning(&mut self, message: &str) {
        match self {
            Some(ctx) => ctx.log_warning(message),
            None => tracing::warn!("{}", message),
        }
    }

    #[inline]
    fn log_error(&mut self, message: &str) {
        match self {
            Some(ctx) => ctx.log_error(message),
            None => tracing::error!("{}", message),
        }
    }
}
