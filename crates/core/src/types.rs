use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Authenticated dashboard user as returned by `/auth/login` and `/auth/me`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub role: String,
}

/// Derived view of the current session. Never persisted on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub user: Option<UserProfile>,
}

impl Session {
    /// A session with no credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A session backed by a valid credential
    pub fn authenticated(user: Option<UserProfile>) -> Self {
        Self {
            is_authenticated: true,
            user,
        }
    }
}

/// Direction of a logged call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallType {
    Incoming,
    Outgoing,
    Missed,
    Other,
}

impl CallType {
    /// Classify a raw call type, ignoring case
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "INCOMING" => Self::Incoming,
            "OUTGOING" => Self::Outgoing,
            "MISSED" => Self::Missed,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incoming => "Incoming",
            Self::Outgoing => "Outgoing",
            Self::Missed => "Missed",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for CallType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single entry of the `/calllogs` feed
///
/// The backend encodes `timestamp` (epoch millis) and `duration` (seconds) as
/// strings on some records and numbers on others; both are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(deserialize_with = "string_or_number")]
    pub timestamp: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "phoneNumber")]
    pub phone_number: String,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl CallLog {
    pub fn call_type(&self) -> CallType {
        CallType::parse(&self.kind)
    }

    /// Caller name, or "Unknown" when the record has none
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown"
        } else {
            &self.name
        }
    }

    /// Call duration in seconds; unparsable values count as zero
    pub fn duration_secs(&self) -> u64 {
        self.duration
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|secs| secs.is_finite() && *secs >= 0.0)
            .map_or(0, |secs| secs as u64)
    }

    /// Render the duration as `"{m}m {s}s"`, or `"{s}s"` under a minute
    pub fn formatted_duration(&self) -> String {
        let secs = self.duration_secs();
        let mins = secs / 60;
        let rem = secs % 60;
        if mins > 0 {
            format!("{mins}m {rem}s")
        } else {
            format!("{rem}s")
        }
    }

    /// When the call happened, if the timestamp is a valid epoch-millis value
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        let millis = self.timestamp.trim().parse::<f64>().ok()?;
        DateTime::from_timestamp_millis(millis as i64)
    }
}

/// A message folded into a grouped notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub title: String,
    pub text: String,
}

/// A single entry of the `/notifications` feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationLog {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub app: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    /// Epoch millis
    pub time: i64,
    #[serde(
        rename = "groupedMessages",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grouped_messages: Option<Vec<NotificationMessage>>,
}

impl NotificationLog {
    /// Window within which a notification is highlighted as recent
    pub const RECENT_WINDOW_MINUTES: i64 = 30;

    /// True when the notification arrived within the last 30 minutes of `now`
    pub fn is_recent(&self, now: DateTime<Utc>) -> bool {
        let cutoff = now - Duration::minutes(Self::RECENT_WINDOW_MINUTES);
        self.time > cutoff.timestamp_millis()
    }

    pub fn grouped(&self) -> &[NotificationMessage] {
        self.grouped_messages.as_deref().unwrap_or_default()
    }
}

/// Reference product record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub warranty_information: Option<String>,
    pub shipping_information: Option<String>,
    pub return_policy: Option<String>,
}

impl Product {
    pub const LOW_STOCK_THRESHOLD: i64 = 10;

    pub fn discounted_price(&self) -> f64 {
        self.price * (1.0 - self.discount_percentage / 100.0)
    }

    pub fn has_discount(&self) -> bool {
        self.discount_percentage > 0.0
    }

    pub fn is_low_stock(&self) -> bool {
        self.stock < Self::LOW_STOCK_THRESHOLD
    }

    /// Image at `index`, falling back to the thumbnail
    pub fn primary_image(&self, index: usize) -> &str {
        self.images
            .get(index)
            .filter(|url| !url.is_empty())
            .map_or(self.thumbnail.as_str(), String::as_str)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub name: String,
    pub title: String,
    pub department: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hair {
    pub color: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Bank {
    pub card_expire: String,
    pub card_number: String,
    pub card_type: String,
    pub currency: String,
    pub iban: String,
}

/// Reference customer record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Customer {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub image: String,
    pub address: Address,
    pub company: Company,
    pub age: u32,
    pub gender: String,
    pub birth_date: String,
    pub blood_group: String,
    pub height: f64,
    pub weight: f64,
    pub eye_color: String,
    pub hair: Hair,
    pub bank: Bank,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Upper-cased first letters of the first and last name
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call_log(duration: serde_json::Value) -> CallLog {
        serde_json::from_value(json!({
            "_id": "c1",
            "timestamp": "1700000000000",
            "name": "",
            "phoneNumber": "+15550100",
            "duration": duration,
            "type": "incoming"
        }))
        .unwrap()
    }

    #[test]
    fn test_call_log_accepts_numeric_duration() {
        let log = call_log(json!(125));
        assert_eq!(log.duration, "125");
        assert_eq!(log.formatted_duration(), "2m 5s");
    }

    #[test]
    fn test_formatted_duration_under_a_minute() {
        assert_eq!(call_log(json!("42")).formatted_duration(), "42s");
        assert_eq!(call_log(json!("60")).formatted_duration(), "1m 0s");
        assert_eq!(call_log(json!("garbage")).formatted_duration(), "0s");
    }

    #[test]
    fn test_call_type_is_case_insensitive() {
        let log = call_log(json!("1"));
        assert_eq!(log.call_type(), CallType::Incoming);
        assert_eq!(CallType::parse("Missed"), CallType::Missed);
        assert_eq!(CallType::parse("OUTGOING"), CallType::Outgoing);
        assert_eq!(CallType::parse("REJECTED"), CallType::Other);
        assert_eq!(log.display_name(), "Unknown");
    }

    #[test]
    fn test_call_log_timestamp() {
        let log = call_log(json!("1"));
        assert_eq!(
            log.occurred_at().map(|t| t.timestamp_millis()),
            Some(1_700_000_000_000)
        );
    }

    #[test]
    fn test_notification_recency_window() {
        let now = Utc::now();
        let mut log = NotificationLog {
            id: "n1".into(),
            app: "com.whatsapp".into(),
            title: "hi".into(),
            text: "there".into(),
            time: (now - Duration::minutes(10)).timestamp_millis(),
            grouped_messages: None,
        };
        assert!(log.is_recent(now));

        log.time = (now - Duration::minutes(30)).timestamp_millis();
        assert!(!log.is_recent(now));
        assert!(log.grouped().is_empty());
    }

    #[test]
    fn test_notification_grouped_messages() {
        let log: NotificationLog = serde_json::from_value(json!({
            "_id": "n2",
            "app": "org.telegram.messenger",
            "title": "Group",
            "text": "2 new messages",
            "time": 1_700_000_000_000_i64,
            "groupedMessages": [
                {"title": "a", "text": "one"},
                {"title": "b", "text": "two"}
            ]
        }))
        .unwrap();
        assert_eq!(log.grouped().len(), 2);
        assert_eq!(log.grouped()[1].text, "two");
    }

    #[test]
    fn test_product_pricing() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Phone",
            "price": 200.0,
            "discountPercentage": 25.0,
            "stock": 3,
            "thumbnail": "thumb.png",
            "images": []
        }))
        .unwrap();
        assert!((product.discounted_price() - 150.0).abs() < f64::EPSILON);
        assert!(product.has_discount());
        assert!(product.is_low_stock());
        assert_eq!(product.primary_image(0), "thumb.png");
    }

    #[test]
    fn test_customer_initials() {
        let customer: Customer = serde_json::from_value(json!({
            "id": 1,
            "firstName": "emily",
            "lastName": "Johnson",
            "email": "emily@example.com",
            "phone": "+1 555",
            "image": "",
            "address": {"address": "1 Main", "city": "Phoenix", "state": "AZ", "country": "US", "postalCode": "85001"},
            "company": {"name": "Acme", "title": "Engineer", "department": "R&D"},
            "age": 28,
            "gender": "female",
            "birthDate": "1996-5-30",
            "bloodGroup": "O-",
            "height": 193.24,
            "weight": 63.16,
            "eyeColor": "Green",
            "hair": {"color": "Brown", "type": "Curly"},
            "bank": {"cardExpire": "03/26", "cardNumber": "123", "cardType": "Visa", "currency": "USD", "iban": "X"}
        }))
        .unwrap();
        assert_eq!(customer.initials(), "EJ");
        assert_eq!(customer.full_name(), "emily Johnson");
        assert_eq!(customer.hair.kind, "Curly");
    }
}
