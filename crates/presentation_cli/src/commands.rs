//! Geocoding subcommands and their output

use clap::Args;
use integration_opencage::{
    GeocodeRequest, GeocodeResponse, GeocodingClient, ParamValue, Point,
};

/// Arguments of the `geocode` subcommand
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Args)]
pub struct GeocodeArgs {
    /// Place name or address to look up
    pub query: String,

    /// Restrict results to min_lon,min_lat,max_lon,max_lat
    #[arg(long, value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Option<[f64; 4]>,

    /// Restrict results to country code(s), e.g. "de" or "de,at"
    #[arg(long)]
    pub country_code: Option<String>,

    /// Preferred response language, e.g. "en" or "native"
    #[arg(short, long)]
    pub language: Option<String>,

    /// Maximum number of results (1-100)
    #[arg(long)]
    pub limit: Option<u32>,

    /// Prefer results near lat,lon
    #[arg(long, value_parser = parse_proximity, allow_hyphen_values = true)]
    pub proximity: Option<Point>,

    /// Abbreviate the formatted address
    #[arg(long)]
    pub abbreviate: bool,

    /// Leave POI names out of the formatted address
    #[arg(long)]
    pub address_only: bool,

    /// Ask the API to echo the request parameters
    #[arg(long)]
    pub add_request: bool,

    /// Skip annotations
    #[arg(long)]
    pub no_annotations: bool,

    /// Keep duplicate results
    #[arg(long)]
    pub no_dedupe: bool,

    /// Ask the API not to log the query
    #[arg(long)]
    pub no_record: bool,

    /// Match the nearest road
    #[arg(long)]
    pub roadinfo: bool,

    /// Extra API parameter as key=value (repeatable; "true" sends a flag)
    #[arg(long = "param", value_parser = parse_param)]
    pub params: Vec<(String, ParamValue)>,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

/// Arguments of the `reverse` subcommand
#[derive(Debug, Args)]
pub struct ReverseArgs {
    /// Latitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub latitude: f64,

    /// Longitude in degrees
    #[arg(allow_negative_numbers = true)]
    pub longitude: f64,

    /// Preferred response language
    #[arg(short, long)]
    pub language: Option<String>,

    /// Print the raw JSON response
    #[arg(long)]
    pub json: bool,
}

impl GeocodeArgs {
    /// Build the API request; only flags given on the command line are sent
    pub fn to_request(&self) -> GeocodeRequest {
        let mut request = GeocodeRequest::new(self.query.clone());
        request.bounds = self.bounds.map(Vec::from);
        request.country_code.clone_from(&self.country_code);
        request.language.clone_from(&self.language);
        request.limit = self.limit;
        request.proximity = self.proximity;
        request.abbreviate = self.abbreviate.then_some(true);
        request.address_only = self.address_only.then_some(true);
        request.add_request_echo = self.add_request.then_some(true);
        request.suppress_annotations = self.no_annotations.then_some(true);
        request.suppress_dedupe = self.no_dedupe.then_some(true);
        request.suppress_logging = self.no_record.then_some(true);
        request.road_info_mode = self.roadinfo.then_some(true);
        request.additional_params.clone_from(&self.params);
        request
    }
}

impl ReverseArgs {
    /// Build the API request
    pub fn to_request(&self) -> GeocodeRequest {
        let request = GeocodeRequest::reverse(self.latitude, self.longitude);
        match &self.language {
            Some(language) => request.language(language.clone()),
            None => request,
        }
    }
}

/// Run a forward lookup and render the output
pub async fn geocode<C>(client: &C, args: &GeocodeArgs) -> anyhow::Result<String>
where
    C: GeocodingClient + ?Sized,
{
    let response = client.geocode(&args.to_request()).await?;
    render(&response, args.json)
}

/// Run a reverse lookup and render the output
pub async fn reverse<C>(client: &C, args: &ReverseArgs) -> anyhow::Result<String>
where
    C: GeocodingClient + ?Sized,
{
    let response = client.geocode(&args.to_request()).await?;
    render(&response, args.json)
}

fn render(response: &GeocodeResponse, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(response.document())?);
    }
    render_summary(response)
}

/// Human readable listing of all results
pub fn render_summary(response: &GeocodeResponse) -> anyhow::Result<String> {
    let mut out = String::new();

    for (index, result) in response.results()?.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", index + 1, result.formatted));
        out.push_str(&format!("   confidence: {}\n", result.confidence));
        if let Some(point) = result.point()? {
            out.push_str(&format!("   point:      {point}\n"));
        }
        if let Some(bounds) = result.bounds()? {
            out.push_str(&format!("   bounds:     {bounds}\n"));
        }
        if let Some(distance) = result.distance_from_q {
            out.push_str(&format!("   distance:   {} m\n", distance.meters));
        }
    }

    out.push_str(&format!("total results: {}", response.total_results()?));
    Ok(out)
}

fn parse_bounds(value: &str) -> Result<[f64; 4], String> {
    let bounds = value
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid number '{part}': {e}"))
        })
        .collect::<Result<Vec<_>, _>>()?;

    <[f64; 4]>::try_from(bounds).map_err(|bounds| {
        format!(
            "expected min_lon,min_lat,max_lon,max_lat, got {} values",
            bounds.len()
        )
    })
}

fn parse_proximity(value: &str) -> Result<Point, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| "expected lat,lon".to_string())?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|e| format!("invalid latitude: {e}"))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|e| format!("invalid longitude: {e}"))?;
    Point::new(lat, lon).map_err(|e| e.to_string())
}

fn parse_param(value: &str) -> Result<(String, ParamValue), String> {
    let (key, raw) = value
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{value}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err("parameter name must not be empty".to_string());
    }

    let value = match raw {
        "true" => ParamValue::Bool(true),
        "false" => ParamValue::Bool(false),
        other => ParamValue::Text(other.to_string()),
    };
    Ok((key.to_string(), value))
}
