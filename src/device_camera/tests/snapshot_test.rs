#[cfg(test)]
mod snapshot_test {
    use crate::device_camera::impl_snapshot::DeviceCameraSnapshot;
    use crate::device_camera::interface::{DeviceCamera, DeviceError, Frame};
    use crate::frame_encoder::encode_jpeg;
    use crate::library::logger::impl_fake::LoggerFake;
    use crate::library::stub_endpoint::{Reply, StubEndpoint};
    use image::{DynamicImage, Rgb, RgbImage};
    use std::sync::Arc;
    use std::time::Duration;

    fn camera(url: &str) -> DeviceCameraSnapshot {
        DeviceCameraSnapshot::new(url, Duration::from_secs(2), Arc::new(LoggerFake::new()))
    }

    fn jpeg(width: u32, height: u32) -> Vec<u8> {
        let frame = Frame::new(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            width,
            height,
            Rgb([40, 80, 120]),
        )));
        encode_jpeg(frame, 90).unwrap().bytes
    }

    #[test]
    fn test_captures_decoded_snapshot() {
        let stub = StubEndpoint::start_at("/snapshot.jpg", Reply::jpeg(jpeg(40, 30)));

        let stream = camera(&stub.url).open().unwrap();
        let frame = stream.capture_frame().unwrap();

        assert_eq!((frame.width(), frame.height()), (40, 30));
        // One probe on open, one per capture.
        let requests = stub.requests();
        assert_eq!(requests.len(), 2);
        assert!(requests.iter().all(|r| r.method == "GET" && r.path == "/snapshot.jpg"));
    }

    #[test]
    fn test_forbidden_camera_is_permission_denied() {
        let stub = StubEndpoint::start_at("/snapshot.jpg", Reply::status(403, "forbidden"));

        let result = camera(&stub.url).open();

        assert!(matches!(result, Err(DeviceError::PermissionDenied(_))));
    }

    #[test]
    fn test_non_image_is_unavailable() {
        let stub = StubEndpoint::start_at("/snapshot.jpg", Reply::json("{}"));

        let result = camera(&stub.url).open();

        assert!(matches!(result, Err(DeviceError::Unavailable(_))));
    }

    #[test]
    fn test_unreachable_camera_is_unavailable() {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();

        let result = camera(&format!("http://127.0.0.1:{}/snapshot.jpg", port)).open();

        assert!(matches!(result, Err(DeviceError::Unavailable(_))));
    }
}
