//! Satellite image canvas and the mapping between world space and
//! image-local pixel coordinates.
//!
//! The sprite is centred on the world origin. Image-local coordinates put the
//! origin at the top-left corner with y growing downward, so
//! `world = (x - w/2, h/2 - y)`.

use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use crate::outline::Point;
use crate::services::RasterImage;

/// The image outlines are drawn on.
#[derive(Resource, Default)]
pub struct SatelliteCanvas {
    pub image: Option<Handle<Image>>,
    pub size: Vec2,
    /// Where the image came from (tile URL or file path), for display
    pub source: Option<String>,
}

impl SatelliteCanvas {
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

/// Marker for the sprite showing the canvas image
#[derive(Component)]
pub struct CanvasSprite;

pub fn world_to_image(world: Vec2, size: Vec2) -> Point {
    Point::new(
        (world.x + size.x / 2.0) as f64,
        (size.y / 2.0 - world.y) as f64,
    )
}

pub fn image_to_world(point: Point, size: Vec2) -> Vec2 {
    Vec2::new(
        point.x as f32 - size.x / 2.0,
        size.y / 2.0 - point.y as f32,
    )
}

/// Upload decoded pixels as a Bevy image asset.
pub fn raster_to_image(raster: RasterImage) -> Image {
    Image::new(
        Extent3d {
            width: raster.width,
            height: raster.height,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        raster.rgba,
        TextureFormat::Rgba8UnormSrgb,
        default(),
    )
}

/// Keep a single sprite in sync with the canvas resource.
pub fn sync_canvas_sprite(
    mut commands: Commands,
    canvas: Res<SatelliteCanvas>,
    mut sprites: Query<(Entity, &mut Sprite), With<CanvasSprite>>,
) {
    let Some(handle) = canvas.image.clone() else {
        for (entity, _) in sprites.iter() {
            commands.entity(entity).despawn();
        }
        return;
    };

    if let Ok((_, mut sprite)) = sprites.single_mut() {
        if sprite.image != handle {
            sprite.image = handle;
        }
        return;
    }

    commands.spawn((
        Sprite::from_image(handle),
        Transform::from_translation(Vec3::ZERO),
        CanvasSprite,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIZE: Vec2 = Vec2::new(640.0, 480.0);

    #[test]
    fn test_world_origin_is_image_center() {
        assert_eq!(world_to_image(Vec2::ZERO, SIZE), Point::new(320.0, 240.0));
    }

    #[test]
    fn test_top_left_corner() {
        let world = Vec2::new(-320.0, 240.0);
        assert_eq!(world_to_image(world, SIZE), Point::new(0.0, 0.0));
        assert_eq!(image_to_world(Point::new(0.0, 0.0), SIZE), world);
    }

    #[test]
    fn test_y_axis_points_down_in_image() {
        let upper = world_to_image(Vec2::new(0.0, 100.0), SIZE);
        let lower = world_to_image(Vec2::new(0.0, -100.0), SIZE);
        assert!(upper.y < lower.y);
    }

    #[test]
    fn test_mapping_is_inverse() {
        let point = Point::new(123.0, 456.0);
        let back = world_to_image(image_to_world(point, SIZE), SIZE);
        assert!((back.x - point.x).abs() < 1e-4);
        assert!((back.y - point.y).abs() < 1e-4);
    }

    #[test]
    fn test_raster_to_image_size() {
        let raster = RasterImage {
            width: 2,
            height: 3,
            rgba: vec![0; 2 * 3 * 4],
        };
        let image = raster_to_image(raster);
        assert_eq!(image.width(), 2);
        assert_eq!(image.height(), 3);
    }

    #[test]
    fn test_unloaded_canvas() {
        let canvas = SatelliteCanvas::default();
        assert!(!canvas.is_loaded());
    }
}
