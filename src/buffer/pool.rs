use std::sync::{Mutex, PoisonError};

// Upper bound on idle buffers kept around for reuse
const POOL_SIZE_MAX: usize = 200;

// Shared by every connection in the process, hence the lock
static FREE_LIST: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());

/// Takes a zeroed byte array of at least `capacity` bytes, reusing a released one if available.
pub fn acquire(capacity: usize) -> Vec<u8> {
    let recycled = FREE_LIST
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .pop();

    match recycled {
        Some(mut data) => {
            data.fill(0);
            if data.len() < capacity {
                data.resize(capacity, 0);
            }
            data
        }
        None => vec![0; capacity],
    }
}

/// Returns a byte array to the free list. Arrays beyond the pool limit are simply dropped.
pub fn release(data: Vec<u8>) {
    if data.is_empty() {
        return;
    }

    let mut free = FREE_LIST.lock().unwrap_or_else(PoisonError::into_inner);

    if free.len() < POOL_SIZE_MAX {
        free.push(data);
    }
}

#[cfg(test)]
pub fn idle_count() -> usize {
    FREE_LIST
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .len()
}
