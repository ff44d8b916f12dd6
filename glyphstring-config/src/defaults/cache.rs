//! Default values for layout cache tuning.

pub fn retained_strings() -> usize {
    512 // Recently queried strings kept alive without an explicit handle
}

pub fn sweep_interval() -> usize {
    64 // Cache misses between sweeps of unreachable layouts
}
