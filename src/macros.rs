/// Bump a mapping statistics counter: `stat!(map_calls)` adds one,
/// `stat!(grown_pages, n)` adds `n`.
///
/// Without the `stats` feature this expands to nothing, and the value
/// expression is not evaluated.
#[macro_export]
macro_rules! stat {
    ($counter:ident) => {
        $crate::stat!($counter, 1u64)
    };
    ($counter:ident, $val:expr) => {
        #[cfg(feature = "stats")]
        {
            $crate::stats::STATS
                .$counter
                .fetch_add($val as u64, ::core::sync::atomic::Ordering::Relaxed);
        }
    };
}
