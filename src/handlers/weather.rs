//! `weather <location> [forecast N hours|days]` via WeatherAPI.com.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::warn;

use super::core::{Context, Handler};
use crate::config::WeatherConfig;
use crate::error::HandlerResult;

const MAX_FORECAST_HOURS: u32 = 24;
const MAX_FORECAST_DAYS: u32 = 7;

const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA",
    "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ",
    "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT",
    "VA", "WA", "WV", "WI", "WY",
];

const COUNTRY_CODES: &[&str] = &[
    "US", "UK", "CA", "AU", "DE", "FR", "IT", "ES", "JP", "CN", "IN", "BR", "MX", "RU", "KR",
    "NL", "SE", "NO", "DK", "FI", "CH", "AT", "BE", "IE", "NZ", "ZA", "SG", "MY", "TH", "VN",
];

const COUNTRY_SHORT: &[(&str, &str)] = &[
    ("United States of America", "USA"),
    ("United Kingdom", "UK"),
    ("United States", "USA"),
    ("Great Britain", "UK"),
    ("England", "UK"),
    ("Scotland", "UK"),
    ("Wales", "UK"),
    ("Northern Ireland", "UK"),
    ("Canada", "CA"),
    ("Australia", "AU"),
    ("Germany", "DE"),
    ("France", "FR"),
    ("Italy", "IT"),
    ("Spain", "ES"),
    ("Japan", "JP"),
    ("China", "CN"),
    ("India", "IN"),
    ("Brazil", "BR"),
    ("Mexico", "MX"),
    ("Russia", "RU"),
    ("South Korea", "KR"),
    ("Netherlands", "NL"),
    ("Sweden", "SE"),
    ("Norway", "NO"),
    ("Denmark", "DK"),
    ("Finland", "FI"),
    ("Switzerland", "CH"),
    ("Austria", "AT"),
    ("Belgium", "BE"),
    ("Ireland", "IE"),
    ("New Zealand", "NZ"),
    ("South Africa", "ZA"),
    ("Singapore", "SG"),
    ("Malaysia", "MY"),
    ("Thailand", "TH"),
    ("Vietnam", "VN"),
];

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WeatherRequest {
    Current { location: String },
    Hourly { location: String, hours: u32 },
    Daily { location: String, days: u32 },
}

#[derive(Debug, PartialEq, Eq)]
pub enum RequestError {
    Usage,
    BadPeriod,
}

/// Parse the arguments after the command word.
///
/// `forecast N` defaults to hours; an unknown unit falls back to current
/// conditions.
pub fn parse_request(args: &str) -> Result<WeatherRequest, RequestError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.is_empty() {
        return Err(RequestError::Usage);
    }

    let Some(at) = parts.iter().position(|p| p.eq_ignore_ascii_case("forecast")) else {
        return Ok(WeatherRequest::Current {
            location: format_location_query(&parts),
        });
    };

    let location = format_location_query(&parts[..at]);
    let Some(period) = parts.get(at + 1) else {
        return Ok(WeatherRequest::Current { location });
    };
    let period: u32 = period.parse().map_err(|_| RequestError::BadPeriod)?;
    let unit = parts
        .get(at + 2)
        .map(|u| u.to_ascii_lowercase())
        .unwrap_or_else(|| "hours".to_string());

    Ok(match unit.as_str() {
        "hours" => WeatherRequest::Hourly {
            location,
            hours: period.min(MAX_FORECAST_HOURS),
        },
        "days" => WeatherRequest::Daily {
            location,
            days: period.min(MAX_FORECAST_DAYS),
        },
        _ => WeatherRequest::Current { location },
    })
}

/// `Hollywood FL` becomes `Hollywood, FL`; text with a comma is left alone.
pub fn format_location_query(parts: &[&str]) -> String {
    let joined = parts.join(" ");
    if joined.contains(',') || parts.len() < 2 {
        return joined;
    }

    let last = parts[parts.len() - 1].to_ascii_uppercase();
    if US_STATES.contains(&last.as_str()) || COUNTRY_CODES.contains(&last.as_str()) {
        let city = parts[..parts.len() - 1].join(" ");
        return format!("{city}, {last}");
    }
    joined
}

pub fn shorten_country(name: &str) -> &str {
    COUNTRY_SHORT
        .iter()
        .find(|(long, _)| *long == name)
        .map_or(name, |&(_, short)| short)
}

fn location_display(loc: &Location) -> String {
    let country = shorten_country(&loc.country);
    if !loc.region.is_empty() && loc.region != loc.name {
        format!("{}, {}, {}", loc.name, loc.region, country)
    } else {
        format!("{}, {}", loc.name, country)
    }
}

// =============================================================================
// Response payload
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct WeatherResponse {
    location: Location,
    current: Option<Current>,
    forecast: Option<Forecast>,
}

#[derive(Debug, Deserialize)]
struct Location {
    name: String,
    #[serde(default)]
    region: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct Condition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Current {
    temp_c: f64,
    temp_f: f64,
    condition: Condition,
    humidity: f64,
    wind_kph: f64,
    wind_mph: f64,
}

#[derive(Debug, Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Debug, Deserialize)]
struct ForecastDay {
    date: String,
    day: Day,
    #[serde(default)]
    hour: Vec<Hour>,
}

#[derive(Debug, Deserialize)]
struct Day {
    maxtemp_c: f64,
    maxtemp_f: f64,
    mintemp_c: f64,
    mintemp_f: f64,
    condition: Condition,
}

#[derive(Debug, Deserialize)]
struct Hour {
    time: String,
    temp_c: f64,
    temp_f: f64,
    condition: Condition,
}

/// Render a payload for `request`; `None` when the payload lacks the
/// section the request needs.
pub fn format_report(request: &WeatherRequest, data: &WeatherResponse) -> Option<String> {
    let place = location_display(&data.location);
    match request {
        WeatherRequest::Current { .. } => {
            let now = data.current.as_ref()?;
            Some(format!(
                "🌤️ {place}: {:.1}°F ({:.1}°C), {}, Humidity: {}%, Wind: {:.1} mph ({:.1} km/h)",
                now.temp_f,
                now.temp_c,
                now.condition.text,
                now.humidity,
                now.wind_mph,
                now.wind_kph,
            ))
        }
        WeatherRequest::Hourly { hours, .. } => {
            let today = data.forecast.as_ref()?.forecastday.first()?;
            let parts: Vec<String> = today
                .hour
                .iter()
                .take(*hours as usize)
                .map(|h| {
                    let clock = h
                        .time
                        .split_once(' ')
                        .map_or(h.time.as_str(), |(_, t)| t);
                    let clock: String = clock.chars().take(5).collect();
                    format!(
                        "{clock}: {:.1}°F ({:.1}°C), {}",
                        h.temp_f, h.temp_c, h.condition.text
                    )
                })
                .collect();
            Some(format!("🌤️ {place} - {hours}h forecast: {}", parts.join(" | ")))
        }
        WeatherRequest::Daily { days, .. } => {
            let parts: Vec<String> = data
                .forecast
                .as_ref()?
                .forecastday
                .iter()
                .take(*days as usize)
                .map(|d| {
                    let date = NaiveDate::parse_from_str(&d.date, "%Y-%m-%d")
                        .map(|date| date.format("%m/%d").to_string())
                        .unwrap_or_else(|_| d.date.clone());
                    format!(
                        "{date}: {:.1}°F/{:.1}°F ({:.1}°C/{:.1}°C), {}",
                        d.day.maxtemp_f,
                        d.day.mintemp_f,
                        d.day.maxtemp_c,
                        d.day.mintemp_c,
                        d.day.condition.text
                    )
                })
                .collect();
            Some(format!("🌤️ {place} - {days}d forecast: {}", parts.join(" | ")))
        }
    }
}

/// `weather` command.
pub struct WeatherHandler {
    command: String,
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WeatherHandler {
    pub fn new(command: impl Into<String>, client: reqwest::Client, config: &WeatherConfig) -> Self {
        Self {
            command: command.into(),
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn fetch(
        &self,
        key: &str,
        request: &WeatherRequest,
    ) -> Result<WeatherResponse, reqwest::Error> {
        let (endpoint, location, extra) = match request {
            WeatherRequest::Current { location } => ("current.json", location, None),
            WeatherRequest::Hourly { location, hours } => {
                ("forecast.json", location, Some(("hours", hours.to_string())))
            }
            WeatherRequest::Daily { location, days } => {
                ("forecast.json", location, Some(("days", days.to_string())))
            }
        };

        let mut query = vec![("key", key.to_string()), ("q", location.clone())];
        query.extend(extra);
        query.push(("aqi", "no".to_string()));

        self.client
            .get(format!("{}/{}", self.base_url, endpoint))
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl Handler for WeatherHandler {
    async fn handle(&self, _ctx: &Context, sender: &str, text: &str) -> HandlerResult {
        let args = text.strip_prefix(self.command.as_str()).unwrap_or(text);
        let request = match parse_request(args) {
            Ok(request) => request,
            Err(RequestError::Usage) => {
                let c = &self.command;
                return Ok(Some(format!(
                    "Usage: {c} <city> or {c} <city> forecast <hours/days> (e.g., {c} London forecast 5 hours). Supports city, state/country: {c} Hollywood FL, {c} Manchester UK"
                )));
            }
            Err(RequestError::BadPeriod) => {
                return Ok(Some(format!(
                    "Sorry {sender}, invalid forecast period. Use a number (e.g., {} London forecast 5 hours)",
                    self.command
                )));
            }
        };

        let Some(key) = self.api_key.as_deref() else {
            return Ok(Some(format!(
                "Sorry {sender}, weather API key not configured."
            )));
        };

        let data = match self.fetch(key, &request).await {
            Ok(data) => data,
            Err(e) if e.is_decode() => {
                warn!(error = %e, "weather data parsing error");
                return Ok(Some(format!("Sorry {sender}, weather data format error.")));
            }
            Err(e) => {
                warn!(error = %e, "weather API error");
                return Ok(Some(format!(
                    "Sorry {sender}, couldn't get weather for that location."
                )));
            }
        };

        match format_report(&request, &data) {
            Some(report) => Ok(Some(report)),
            None => {
                warn!(?request, "weather payload missing requested section");
                Ok(Some(format!("Sorry {sender}, weather data format error.")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::stats::StatsStore;
    use chrono::Local;
    use std::sync::Arc;

    fn sample(json: &str) -> WeatherResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_parse_request_forms() {
        assert_eq!(parse_request("  "), Err(RequestError::Usage));
        assert_eq!(
            parse_request(" London"),
            Ok(WeatherRequest::Current {
                location: "London".into()
            })
        );
        assert_eq!(
            parse_request(" Paris forecast 5"),
            Ok(WeatherRequest::Hourly {
                location: "Paris".into(),
                hours: 5
            })
        );
        assert_eq!(
            parse_request(" Paris FORECAST 30 Days"),
            Ok(WeatherRequest::Daily {
                location: "Paris".into(),
                days: 7
            })
        );
        assert_eq!(
            parse_request(" Paris forecast 48 hours"),
            Ok(WeatherRequest::Hourly {
                location: "Paris".into(),
                hours: 24
            })
        );
        assert_eq!(
            parse_request(" Paris forecast"),
            Ok(WeatherRequest::Current {
                location: "Paris".into()
            })
        );
        assert_eq!(
            parse_request(" Paris forecast soon"),
            Err(RequestError::BadPeriod)
        );
        assert_eq!(
            parse_request(" Paris forecast 2 weeks"),
            Ok(WeatherRequest::Current {
                location: "Paris".into()
            })
        );
    }

    #[test]
    fn test_location_query_formatting() {
        assert_eq!(format_location_query(&["Hollywood", "fl"]), "Hollywood, FL");
        assert_eq!(format_location_query(&["Manchester", "UK"]), "Manchester, UK");
        assert_eq!(format_location_query(&["New", "York", "NY"]), "New York, NY");
        assert_eq!(format_location_query(&["Hollywood,", "FL"]), "Hollywood, FL");
        assert_eq!(format_location_query(&["San", "Francisco"]), "San Francisco");
        assert_eq!(format_location_query(&["Paris"]), "Paris");
    }

    #[test]
    fn test_shorten_country() {
        assert_eq!(shorten_country("United States of America"), "USA");
        assert_eq!(shorten_country("Scotland"), "UK");
        assert_eq!(shorten_country("Peru"), "Peru");
    }

    #[test]
    fn test_current_report() {
        let data = sample(
            r#"{"location":{"name":"Hollywood","region":"Florida","country":"United States of America"},
                "current":{"temp_c":27.2,"temp_f":81.0,"condition":{"text":"Sunny"},
                           "humidity":65,"wind_kph":11.2,"wind_mph":6.9}}"#,
        );
        let request = WeatherRequest::Current {
            location: "Hollywood, FL".into(),
        };
        assert_eq!(
            format_report(&request, &data).unwrap(),
            "🌤️ Hollywood, Florida, USA: 81.0°F (27.2°C), Sunny, Humidity: 65%, Wind: 6.9 mph (11.2 km/h)"
        );
    }

    #[test]
    fn test_region_equal_to_city_is_hidden() {
        let data = sample(
            r#"{"location":{"name":"London","region":"London","country":"United Kingdom"},
                "current":{"temp_c":10.0,"temp_f":50.0,"condition":{"text":"Rain"},
                           "humidity":90,"wind_kph":5.0,"wind_mph":3.1}}"#,
        );
        let report = format_report(
            &WeatherRequest::Current {
                location: "London".into(),
            },
            &data,
        )
        .unwrap();
        assert!(report.starts_with("🌤️ London, UK: "));
    }

    #[test]
    fn test_hourly_and_daily_reports() {
        let data = sample(
            r#"{"location":{"name":"Paris","region":"Ile-de-France","country":"France"},
                "forecast":{"forecastday":[
                  {"date":"2024-05-15",
                   "day":{"maxtemp_c":20.0,"maxtemp_f":68.0,"mintemp_c":10.0,"mintemp_f":50.0,"condition":{"text":"Cloudy"}},
                   "hour":[
                     {"time":"2024-05-15 00:00","temp_c":12.0,"temp_f":53.6,"condition":{"text":"Clear"}},
                     {"time":"2024-05-15 01:00","temp_c":11.5,"temp_f":52.7,"condition":{"text":"Clear"}},
                     {"time":"2024-05-15 02:00","temp_c":11.0,"temp_f":51.8,"condition":{"text":"Mist"}}]},
                  {"date":"2024-05-16",
                   "day":{"maxtemp_c":22.0,"maxtemp_f":71.6,"mintemp_c":12.0,"mintemp_f":53.6,"condition":{"text":"Sunny"}}}]}}"#,
        );

        let hourly = WeatherRequest::Hourly {
            location: "Paris".into(),
            hours: 2,
        };
        assert_eq!(
            format_report(&hourly, &data).unwrap(),
            "🌤️ Paris, Ile-de-France, FR - 2h forecast: 00:00: 53.6°F (12.0°C), Clear | 01:00: 52.7°F (11.5°C), Clear"
        );

        let daily = WeatherRequest::Daily {
            location: "Paris".into(),
            days: 3,
        };
        assert_eq!(
            format_report(&daily, &data).unwrap(),
            "🌤️ Paris, Ile-de-France, FR - 3d forecast: 05/15: 68.0°F/50.0°F (20.0°C/10.0°C), Cloudy | 05/16: 71.6°F/53.6°F (22.0°C/12.0°C), Sunny"
        );
    }

    #[test]
    fn test_missing_section_is_none() {
        let data = sample(r#"{"location":{"name":"X","country":"Y"}}"#);
        let request = WeatherRequest::Current {
            location: "X".into(),
        };
        assert!(format_report(&request, &data).is_none());
    }

    #[tokio::test]
    async fn test_missing_key_is_reported_to_user() {
        let ctx = Context {
            stats: StatsStore::shared(Local::now()),
            clock: Arc::new(SystemClock),
            commands: Vec::new(),
        };
        let handler = WeatherHandler::new(".weather", reqwest::Client::new(), &WeatherConfig::default());

        let reply = handler.handle(&ctx, "nick", ".weather London").await.unwrap();
        assert_eq!(
            reply.as_deref(),
            Some("Sorry nick, weather API key not configured.")
        );

        let reply = handler.handle(&ctx, "nick", ".weather").await.unwrap().unwrap();
        assert!(reply.starts_with("Usage: .weather <city>"));
    }
}
