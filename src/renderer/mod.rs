pub mod axes;
pub mod camera;
pub mod canvas;
pub mod colormap;
pub mod figure;
pub mod scene;
pub mod text;
pub mod theme;

pub use axes::Axes3D;
pub use camera::{Projected, Projector, ViewCamera};
pub use canvas::{Canvas, Rgba8};
pub use colormap::{Colormap, Normalize};
pub use figure::{Colorbar, Figure, RenderedImage};
pub use scene::{Label, LabelBox, Line3, Marker, MarkerShape, Scene};
pub use text::{FontBook, HAlign, TextStyle, VAlign};
pub use theme::FigureStyle;
