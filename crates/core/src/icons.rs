//! App icon lookup for notification sources

/// Package id to simple-icons slug. Order matters: the first key contained in
/// an id wins.
const ICON_TABLE: &[(&str, &str)] = &[
    ("com.whatsapp", "whatsapp"),
    ("com.instagram.android", "instagram"),
    ("com.facebook.katana", "facebook"),
    ("com.snapchat.android", "snapchat"),
    ("com.twitter.android", "twitter"),
    ("x.com", "twitter"),
    ("org.telegram.messenger", "telegram"),
    ("com.google.android.youtube", "youtube"),
    ("com.spotify.music", "spotify"),
    ("com.google.android.gm", "gmail"),
    ("com.android.chrome", "chrome"),
    ("com.linkedin.android", "linkedin"),
    ("com.reddit.frontpage", "reddit"),
    ("com.github.android", "github"),
    ("com.google.android.apps.docs", "drive"),
    ("com.google.android.apps.maps", "maps"),
    ("com.facebook.orca", "messenger"),
    ("com.slack", "slack"),
    ("com.discord", "discord"),
    ("us.zoom.videomeetings", "zoom"),
    ("com.skype.raider", "skype"),
    // Mixed-case keys never match a lower-cased id.
    ("in.amazon.mShop.android.shopping", "amazon"),
    ("com.netflix.mediaclient", "netflix"),
    ("com.pinterest", "pinterest"),
    ("com.zhiliaoapp.musically", "tiktok"),
    ("net.one97.paytm", "paytm"),
    ("com.phonepe.app", "phonepe"),
    ("com.google.android.apps.nbu.paisa.user", "gpay"),
    ("com.flipkart.android", "flipkart"),
    ("in.swiggy.android", "swiggy"),
    ("com.application.zomato", "zomato"),
    ("com.weather.Weather", "weather"),
];

const ICON_CDN: &str = "https://cdn.jsdelivr.net/npm/simple-icons@v11/icons";

/// Icon used when no table entry matches
pub const DEFAULT_ICON: &str = "/app-icons/default.png";

/// Resolve the slug for an app id: exact match first, then the first table key
/// (in table order) contained in the lower-cased id.
pub fn app_icon_slug(app_id: &str) -> Option<&'static str> {
    let id = app_id.to_lowercase();

    if let Some((_, slug)) = ICON_TABLE.iter().find(|(key, _)| *key == id) {
        tracing::trace!(app_id = %id, "exact icon match");
        return Some(*slug);
    }

    ICON_TABLE
        .iter()
        .find(|(key, _)| id.contains(key))
        .map(|(key, slug)| {
            tracing::trace!(app_id = %id, key = %key, "partial icon match");
            *slug
        })
}

/// Icon URL for a notification's source app
pub fn app_icon_path(app_id: &str) -> String {
    app_icon_slug(app_id).map_or_else(
        || DEFAULT_ICON.to_string(),
        |slug| format!("{ICON_CDN}/{slug}.svg"),
    )
}
