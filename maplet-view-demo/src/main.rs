use maplet_view::{
    engine::headless::{HeadlessContainer, HeadlessEngine},
    Callback, Camera, Coordinate, ImageSource, LatLng, MapHost, MapViewHandle, MapViewOptions,
    MapViewProps, MarkerPressEvent, MarkerProps, PanDragEvent, Region, RegionChangeDetails,
};

/// Mounts a map view on the headless engine and walks it through a session.
///
/// Usage: `maplet-view-demo [options.json]`. Run with `RUST_LOG=debug` to see
/// the adapter's own logging.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    let options = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("loading options from {}", path);
            MapViewOptions::from_json_str(&std::fs::read_to_string(path)?)?
        }
        None => MapViewOptions::default(),
    };

    let container = HeadlessContainer::new(1200.0, 800.0);
    let mut host = MapHost::with_options(HeadlessEngine::new(), options);

    // San Francisco, with a few landmarks
    let props = MapViewProps::new()
        .with_region(Region::new(37.7749, -122.4194, 0.1, 0.1))
        .with_zoom_levels(Some(3.0), Some(18.0))
        .on_map_ready(|_: ()| log::info!("map ready"))
        .on_region_change(|(region, details): (Region, RegionChangeDetails)| {
            log::info!(
                "region change to ({:.4}, {:.4}), gesture: {}",
                region.latitude,
                region.longitude,
                details.is_gesture
            )
        })
        .on_region_change_complete(Callback::new(
            |(region, _): (Region, RegionChangeDetails)| {
                log::info!(
                    "region settled at ({:.4}, {:.4})",
                    region.latitude,
                    region.longitude
                )
            },
        ))
        .on_pan_drag(|event: PanDragEvent| log::info!("pan-drag ({})", event.native.kind))
        .with_marker("ferry", landmark("ferry", 37.7955, -122.3937, "Ferry Building"))
        .with_marker(
            "tower",
            landmark("tower", 37.8024, -122.4058, "Coit Tower")
                .with_image(ImageSource::image("https://example.com/tower.png", 24.0, 32.0)),
        )
        .with_marker("park", landmark("park", 37.7694, -122.4862, "Golden Gate Park"));

    host.render(&props, Some(&container));
    let handle = host.handle();

    if let Some(map) = handle.get_map().get() {
        map.fire_load();
        map.drag_to(LatLng::new(37.7849, -122.4094));
        map.end_drag();
    }

    // Re-rendering the same props must not undo the drag
    host.render(&props, Some(&container));

    if let Some(marker) = host.marker("ferry").and_then(|adapter| adapter.marker()) {
        marker.click();
    }

    handle
        .set_camera(Camera::flat(Coordinate::default(), 25.0))
        .await;
    if let Some(camera) = handle.get_camera().await {
        log::info!(
            "camera at ({:.4}, {:.4}) zoom {}",
            camera.center.latitude,
            camera.center.longitude,
            camera.zoom
        );
    }
    if let Some(bounds) = handle.get_map_boundaries().await {
        log::info!("visible {:?}", bounds);
    }

    let journal = host.engine().journal();
    host.unmount();
    log::info!("unmounted after {} engine calls", journal.len());

    Ok(())
}

fn landmark(id: &str, latitude: f64, longitude: f64, title: &str) -> MarkerProps {
    MarkerProps::new(Coordinate::new(latitude, longitude))
        .with_identifier(id)
        .with_title(title)
        .on_press(|event: MarkerPressEvent| {
            log::info!("pressed {:?} ({:?})", event.id, event.action)
        })
}
