pub mod grid_overlay;
pub mod page_layout;
pub mod print_plan;
pub mod share;

pub use grid_overlay::{
    CornerSampling, GridAxis, GridLabel, GridLineFeature, GridOverlay, GridOverlayBuilder,
    LabelEdge, MAX_GRID_LINES, UtmExtent,
};
pub use page_layout::{
    Footer, NorthArrow, PageGridLabel, PageGridLine, PageLayout, PageProjector, ScaleBar,
    mm_to_pt, mm_to_px, nice_number, output_file_name, page_grid_lines,
};
pub use print_plan::{
    PageComposer, PlannedPage, PrintPlan, PrintRequest, PrintRequestBuilder, single_page_bounds,
};
pub use share::{BaseLayer, MapStyle, ShareState};
