//! Scratch buffers reused across comment assembly.

use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};

use once_cell::sync::Lazy;

const INITIAL_CAPACITY: usize = 100;
const MAX_POOLED: usize = 32;

static GLOBAL: Lazy<BufferPool> = Lazy::new(BufferPool::default);

/// Pool of `String` scratch buffers.
///
/// Buffers are handed out through an RAII guard and cleared before they
/// re-enter the pool, so no attribute data survives between unrelated calls.
#[derive(Default)]
pub(crate) struct BufferPool {
    buffers: Mutex<Vec<String>>,
}

impl BufferPool {
    /// The process-wide pool shared by all commenters.
    pub(crate) fn global() -> &'static BufferPool {
        &GLOBAL
    }

    /// Take an empty buffer. It returns to the pool when the guard drops,
    /// on every exit path.
    pub(crate) fn acquire(&self) -> PooledBuffer<'_> {
        let buf = self
            .buffers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop()
            .unwrap_or_else(|| String::with_capacity(INITIAL_CAPACITY));
        PooledBuffer { pool: self, buf }
    }

    fn release(&self, mut buf: String) {
        buf.clear();
        let mut buffers = self.buffers.lock().unwrap_or_else(PoisonError::into_inner);
        if buffers.len() < MAX_POOLED {
            buffers.push(buf);
        }
    }
}

pub(crate) struct PooledBuffer<'a> {
    pool: &'a BufferPool,
    buf: String,
}

impl Deref for PooledBuffer<'_> {
    type Target = String;

    fn deref(&self) -> &String {
        &self.buf
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut String {
        &mut self.buf
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        self.pool.release(std::mem::take(&mut self.buf));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffers_are_cleared_between_uses() {
        let pool = BufferPool::default();
        {
            let mut buf = pool.acquire();
            buf.push_str("user='alice'");
        }
        let buf = pool.acquire();
        assert!(buf.is_empty());
    }

    #[test]
    fn released_buffers_are_reused() {
        let pool = BufferPool::default();
        let first = {
            let mut buf = pool.acquire();
            buf.push_str("warm");
            buf.as_ptr()
        };
        let second = pool.acquire();
        assert_eq!(first, second.as_ptr());
    }
}
