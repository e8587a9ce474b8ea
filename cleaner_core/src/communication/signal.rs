//! Single-writer / single-reader atomic cells
//!
//! A signal holds the most recent value of a small `Copy` type packed into
//! one `AtomicU64`. Every `set` is a single atomic store, so a reader can
//! never observe a partially written value. Neither handle is `Clone`: the
//! writer belongs to exactly one producer node and the reader to exactly one
//! consumer.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Types that fit losslessly into a 64-bit word
pub trait SignalValue: Copy + Send + 'static {
    fn pack(self) -> u64;
    fn unpack(bits: u64) -> Self;
}

impl SignalValue for bool {
    fn pack(self) -> u64 {
        self as u64
    }

    fn unpack(bits: u64) -> Self {
        bits != 0
    }
}

impl SignalValue for f32 {
    fn pack(self) -> u64 {
        self.to_bits() as u64
    }

    fn unpack(bits: u64) -> Self {
        f32::from_bits(bits as u32)
    }
}

impl SignalValue for f64 {
    fn pack(self) -> u64 {
        self.to_bits()
    }

    fn unpack(bits: u64) -> Self {
        f64::from_bits(bits)
    }
}

#[derive(Debug)]
struct SignalCell {
    bits: AtomicU64,
    writes: AtomicU64,
}

/// Producer half of a signal
#[derive(Debug)]
pub struct SignalWriter<T> {
    cell: Arc<SignalCell>,
    _marker: PhantomData<fn(T)>,
}

/// Consumer half of a signal
#[derive(Debug)]
pub struct SignalReader<T> {
    cell: Arc<SignalCell>,
    _marker: PhantomData<fn() -> T>,
}

/// Create a signal holding `initial` until the first write
pub fn signal<T: SignalValue>(initial: T) -> (SignalWriter<T>, SignalReader<T>) {
    let cell = Arc::new(SignalCell {
        bits: AtomicU64::new(initial.pack()),
        writes: AtomicU64::new(0),
    });

    (
        SignalWriter {
            cell: cell.clone(),
            _marker: PhantomData,
        },
        SignalReader {
            cell,
            _marker: PhantomData,
        },
    )
}

impl<T: SignalValue> SignalWriter<T> {
    /// Overwrite the current value
    pub fn set(&self, value: T) {
        self.cell.bits.store(value.pack(), Ordering::Release);
        self.cell.writes.fetch_add(1, Ordering::Relaxed);
    }

    /// Value most recently written by this producer
    pub fn current(&self) -> T {
        T::unpack(self.cell.bits.load(Ordering::Acquire))
    }
}

impl<T: SignalValue> SignalReader<T> {
    /// Latest value written by the producer (or the initial value)
    pub fn get(&self) -> T {
        T::unpack(self.cell.bits.load(Ordering::Acquire))
    }

    /// Number of writes since creation
    pub fn write_count(&self) -> u64 {
        self.cell.writes.load(Ordering::Relaxed)
    }

    /// True once the writer has been dropped
    pub fn is_orphaned(&self) -> bool {
        Arc::strong_count(&self.cell) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_value_until_first_write() {
        let (writer, reader) = signal(10.0f32);
        assert_relative_eq!(reader.get(), 10.0);
        assert_eq!(reader.write_count(), 0);

        writer.set(0.45);
        assert_relative_eq!(reader.get(), 0.45);
        assert_eq!(reader.write_count(), 1);
    }

    #[test]
    fn test_bool_signal_overwrites() {
        let (writer, reader) = signal(false);
        writer.set(true);
        writer.set(false);
        writer.set(true);
        assert!(reader.get());
        assert!(writer.current());
        assert_eq!(reader.write_count(), 3);
    }

    #[test]
    fn test_orphaned_after_writer_drop() {
        let (writer, reader) = signal(0.0f64);
        assert!(!reader.is_orphaned());
        drop(writer);
        assert!(reader.is_orphaned());
    }

    #[test]
    fn test_concurrent_writes_never_tear() {
        let (writer, reader) = signal(1.0f64);
        let handle = std::thread::spawn(move || {
            for i in 0..10_000 {
                writer.set(if i % 2 == 0 { 1.0 } else { -1.0 });
            }
        });

        for _ in 0..10_000 {
            let value = reader.get();
            assert!(value == 1.0 || value == -1.0);
        }
        handle.join().unwrap();
    }
}
