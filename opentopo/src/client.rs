use crate::{
    decode,
    http::{HttpClient, ReqwestClient},
    ElevationGrid, ElevationSource, FetchError, C,
};
use geo::geometry::{Coord, Rect};
use log::debug;
use std::{fmt, str::FromStr, time::Instant};

pub const DEFAULT_BASE_URL: &str = "https://portal.opentopography.org";

/// Global DEM datasets served by OpenTopography.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemType {
    /// SRTM 1 arc-second (~30 m).
    Srtmgl1,
    /// SRTM 1 arc-second, ellipsoidal heights.
    Srtmgl1E,
    /// SRTM 3 arc-second (~90 m).
    #[default]
    Srtmgl3,
    /// ALOS World 3D 30 m.
    Aw3d30,
    /// NASADEM 1 arc-second.
    Nasadem,
    /// Copernicus 30 m.
    Cop30,
    /// Copernicus 90 m.
    Cop90,
}

impl DemType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Srtmgl1 => "SRTMGL1",
            Self::Srtmgl1E => "SRTMGL1_E",
            Self::Srtmgl3 => "SRTMGL3",
            Self::Aw3d30 => "AW3D30",
            Self::Nasadem => "NASADEM",
            Self::Cop30 => "COP30",
            Self::Cop90 => "COP90",
        }
    }
}

impl fmt::Display for DemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DemType {
    type Err = FetchError;

    fn from_str(s: &str) -> Result<Self, FetchError> {
        [
            Self::Srtmgl1,
            Self::Srtmgl1E,
            Self::Srtmgl3,
            Self::Aw3d30,
            Self::Nasadem,
            Self::Cop30,
            Self::Cop90,
        ]
        .into_iter()
        .find(|dem| dem.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| FetchError::DemType(s.to_owned()))
    }
}

/// Returns the box spanning `half_span_deg` on each side of `center`.
pub fn bounding_box(center: Coord<C>, half_span_deg: C) -> Rect<C> {
    Rect::new(
        Coord {
            x: center.x - half_span_deg,
            y: center.y - half_span_deg,
        },
        Coord {
            x: center.x + half_span_deg,
            y: center.y + half_span_deg,
        },
    )
}

/// OpenTopography global DEM client.
///
/// Requests are never retried; callers decide what to do with a
/// failure.
pub struct Client<H = ReqwestClient> {
    http: H,
    base_url: String,
    api_key: String,
    dem_type: DemType,
}

impl Client<ReqwestClient> {
    pub fn new(api_key: impl Into<String>) -> Result<Self, FetchError> {
        let http = ReqwestClient::new(ReqwestClient::DEFAULT_TIMEOUT)?;
        Ok(Self::with_http(http, api_key))
    }
}

impl<H: HttpClient> Client<H> {
    pub fn with_http(http: H, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.into(),
            dem_type: DemType::default(),
        }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn dem_type(mut self, dem_type: DemType) -> Self {
        self.dem_type = dem_type;
        self
    }

    /// Returns the request URL for a GeoTIFF covering `bbox`.
    pub fn url(&self, bbox: &Rect<C>) -> String {
        self.url_with_key(bbox, &self.api_key)
    }

    /// Fetches and decodes the raster around `center`.
    pub fn fetch(&self, center: Coord<C>, half_span_deg: C) -> Result<ElevationGrid, FetchError> {
        let bbox = bounding_box(center, half_span_deg);
        debug!("fetching {}", self.url_with_key(&bbox, "<redacted>"));

        let (body, fetch_runtime) = {
            let now = Instant::now();
            let body = self.http.get(&self.url(&bbox))?;
            (body, now.elapsed())
        };

        let (grid, decode_runtime) = {
            let now = Instant::now();
            let grid = decode(&body)?;
            (grid, now.elapsed())
        };

        debug!(
            "raster; bytes: {}, dims: {}x{}, bbox: {:?}, elevations: {:?}, fetch_exec: {:?}, decode_exec: {:?}",
            body.len(),
            grid.width(),
            grid.height(),
            grid.bbox(),
            grid.elevation_range(),
            fetch_runtime,
            decode_runtime
        );

        Ok(grid)
    }
}

/// Private API.
impl<H> Client<H> {
    fn url_with_key(&self, bbox: &Rect<C>, api_key: &str) -> String {
        let Coord { x: west, y: south } = bbox.min();
        let Coord { x: east, y: north } = bbox.max();
        format!(
            "{}/API/globaldem?demtype={}&south={south}&north={north}&west={west}&east={east}&outputFormat=GTiff&API_Key={api_key}",
            self.base_url.trim_end_matches('/'),
            self.dem_type,
        )
    }
}

impl<H: HttpClient> ElevationSource for Client<H> {
    fn fetch(&self, center: Coord<C>, half_span_deg: C) -> Result<ElevationGrid, FetchError> {
        Self::fetch(self, center, half_span_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::{bounding_box, Client, Coord, DemType, FetchError};
    use crate::{geotiff::tests::encode, http::HttpClient};
    use std::sync::Mutex;

    /// Canned single-response transport.
    struct MockHttpClient {
        status: u16,
        body: Vec<u8>,
        requested: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        fn new(status: u16, body: Vec<u8>) -> Self {
            Self {
                status,
                body,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    impl HttpClient for MockHttpClient {
        fn get(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().unwrap().push(url.to_owned());
            if (200..300).contains(&self.status) {
                Ok(self.body.clone())
            } else {
                Err(FetchError::Provider {
                    status: self.status,
                    body: String::from_utf8_lossy(&self.body).into_owned(),
                })
            }
        }
    }

    const LONDON: Coord = Coord {
        x: -0.1278,
        y: 51.5074,
    };

    #[test]
    fn test_bounding_box() {
        let bbox = bounding_box(Coord { x: 10.0, y: -20.0 }, 0.5);
        assert_eq!(bbox.min(), Coord { x: 9.5, y: -20.5 });
        assert_eq!(bbox.max(), Coord { x: 10.5, y: -19.5 });
    }

    #[test]
    fn test_url() {
        let client = Client::with_http(MockHttpClient::new(200, Vec::new()), "secret")
            .base_url("https://example.com/");
        let url = client.url(&bounding_box(Coord { x: 10.0, y: 20.0 }, 0.5));
        assert_eq!(
            url,
            "https://example.com/API/globaldem?demtype=SRTMGL3&south=19.5&north=20.5&west=9.5&east=10.5&outputFormat=GTiff&API_Key=secret"
        );
    }

    #[test]
    fn test_fetch_decodes_raster() {
        let samples: [f32; 4] = [1.0, 2.0, 3.0, 4.0];
        let body = encode(2, 2, Coord { x: 9.5, y: 20.5 }, 0.5, &samples, None);
        let client = Client::with_http(MockHttpClient::new(200, body), "secret")
            .dem_type(DemType::Cop30);
        let grid = client.fetch(Coord { x: 10.0, y: 20.0 }, 0.5).unwrap();
        assert_eq!((grid.width(), grid.height()), (2, 2));
        assert_eq!(grid.samples(), &[1.0, 2.0, 3.0, 4.0]);
        let requested = client.http.requested.lock().unwrap();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].contains("demtype=COP30"));
    }

    #[test]
    fn test_fetch_surfaces_provider_error() {
        let client = Client::with_http(
            MockHttpClient::new(401, b"Invalid API key".to_vec()),
            "wrong",
        );
        match client.fetch(LONDON, 0.5) {
            Err(FetchError::Provider { status, body }) => {
                assert_eq!(status, 401);
                assert_eq!(body, "Invalid API key");
            }
            other => panic!("expected provider error, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_rejects_non_raster_body() {
        let client = Client::with_http(MockHttpClient::new(200, b"not a tiff".to_vec()), "k");
        assert!(matches!(
            client.fetch(LONDON, 0.5),
            Err(FetchError::Format(_))
        ));
    }

    #[test]
    fn test_dem_type_from_str() {
        assert_eq!("srtmgl1".parse::<DemType>().unwrap(), DemType::Srtmgl1);
        assert_eq!("COP90".parse::<DemType>().unwrap(), DemType::Cop90);
        assert_eq!("SRTMGL1_E".parse::<DemType>().unwrap(), DemType::Srtmgl1E);
        assert!(matches!(
            "ETOPO".parse::<DemType>(),
            Err(FetchError::DemType(_))
        ));
        assert_eq!(DemType::default().to_string(), "SRTMGL3");
    }
}
