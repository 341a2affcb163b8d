mod error_coverage;
mod history_bounds;
