// Logging goes to defmt on the target. Host builds have no global logger, so
// the macros only borrow their arguments there.

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "firmware")]
        defmt::info!($s $(, $x)*);
        #[cfg(not(feature = "firmware"))]
        let _ = ($(&$x,)*);
    }};
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "firmware")]
        defmt::warn!($s $(, $x)*);
        #[cfg(not(feature = "firmware"))]
        let _ = ($(&$x,)*);
    }};
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "firmware")]
        defmt::error!($s $(, $x)*);
        #[cfg(not(feature = "firmware"))]
        let _ = ($(&$x,)*);
    }};
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {{
        #[cfg(feature = "firmware")]
        defmt::debug!($s $(, $x)*);
        #[cfg(not(feature = "firmware"))]
        let _ = ($(&$x,)*);
    }};
}
