pub mod elc_prep;
pub mod figure;
pub mod stitch;
pub mod twin;
