//! Field extraction from a parsed detail page.
//!
//! Every function here is total: a selector miss, an absent attribute or a
//! missing fieldset yields [`NOT_AVAILABLE`] or an empty list, never an error.
//! One malformed section therefore never costs the rest of the record.

use kost_core::{DetailUrl, Facilities, ListingRecord, Location, NOT_AVAILABLE};
use scraper::{ElementRef, Html, Selector};

const NAME: &str = "h1.col-md-10";
const OWNER: &str = "div.seller-short li.name";
const PRICE: &str = "div#df_field_price span";

const WHATSAPP_VALUE: &str = "div#df_field_whatsapp div.value";
const SHOW_NUMBER_LABEL: &str = "Lihat Nomor";
const CALL_OWNER: &str = "span.call-owner";
const TEL_PREFIX: &str = "tel:";

const LOCATION_FIELDSET: &str = "div#fs_1049";
const FACILITIES_FIELDSET: &str = "div#fs_1050";
const DESCRIPTION_VALUE: &str = "div#df_field_additional_information .value";

/// Build a full record from a detail page.
#[must_use]
pub fn extract_record(document: &Html, url: &DetailUrl) -> ListingRecord {
    ListingRecord {
        name: name(document),
        owner: owner(document),
        phone: phone(document),
        price: price(document),
        location: location(document),
        facilities: facilities(document),
        description: description(document),
        url: url.as_str().to_string(),
    }
}

/// Listing title.
#[must_use]
pub fn name(document: &Html) -> String {
    text_or_default(document.root_element(), NAME)
}

/// Seller name.
#[must_use]
pub fn owner(document: &Html) -> String {
    text_or_default(document.root_element(), OWNER)
}

/// Displayed price.
#[must_use]
pub fn price(document: &Html) -> String {
    text_or_default(document.root_element(), PRICE)
}

/// Contact number, first tier with a non-empty value wins:
/// the WhatsApp field, then the link after the "show number" label,
/// then the `data-phone` attribute of the call-owner element.
#[must_use]
pub fn phone(document: &Html) -> String {
    let root = document.root_element();

    whatsapp_number(root)
        .or_else(|| show_number_link(root))
        .or_else(|| call_owner_number(root))
        .unwrap_or_else(not_available)
}

fn whatsapp_number(root: ElementRef<'_>) -> Option<String> {
    select_first(root, WHATSAPP_VALUE)
        .map(stripped_text)
        .filter(|phone| !phone.is_empty() && phone != NOT_AVAILABLE)
}

/// First `a[href]` after the label span in document order.
fn show_number_link(root: ElementRef<'_>) -> Option<String> {
    let mut label_seen = false;

    for node in root.descendants() {
        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };

        if !label_seen {
            label_seen = element.value().name() == "span"
                && stripped_text(element) == SHOW_NUMBER_LABEL;
            continue;
        }

        if element.value().name() == "a" {
            if let Some(href) = element.value().attr("href") {
                let number = href.trim();
                let number = number.strip_prefix(TEL_PREFIX).unwrap_or(number).trim();
                return non_empty(number);
            }
        }
    }

    None
}

fn call_owner_number(root: ElementRef<'_>) -> Option<String> {
    select_first(root, CALL_OWNER)
        .and_then(|el| el.value().attr("data-phone"))
        .and_then(|phone| non_empty(phone.trim()))
}

/// Location fieldset. Each sub-field is extracted on its own.
#[must_use]
pub fn location(document: &Html) -> Location {
    let Some(fieldset) = select_first(document.root_element(), LOCATION_FIELDSET) else {
        return Location::default();
    };

    Location {
        property_name: text_or_default(fieldset, "#df_field_nama_kost .value"),
        province: text_or_default(fieldset, "#df_field_lokasi .value"),
        city: text_or_default(fieldset, "#df_field_lokasi_level1 .value"),
        district: text_or_default(fieldset, "#df_field_lokasi_level2 .value"),
        sub_district: text_or_default(fieldset, "#df_field_lokasi_level3 .value"),
        address: text_or_default(fieldset, "#df_field_address .value"),
    }
}

/// Facilities fieldset: room, shared and neighborhood lists.
#[must_use]
pub fn facilities(document: &Html) -> Facilities {
    let Some(fieldset) = select_first(document.root_element(), FACILITIES_FIELDSET) else {
        return Facilities::default();
    };

    Facilities {
        room: list_items(fieldset, "#df_field_fasilitas_kamar li"),
        shared: list_items(fieldset, "#df_field_fasilitas_kost li"),
        neighborhood: list_items(fieldset, "#df_field_fasilitas_sekitar li"),
    }
}

/// Additional information block, text fragments joined by single spaces.
#[must_use]
pub fn description(document: &Html) -> String {
    select_first(document.root_element(), DESCRIPTION_VALUE)
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .and_then(|text| non_empty(&text))
        .unwrap_or_else(not_available)
}

fn select_first<'a>(scope: ElementRef<'a>, css: &str) -> Option<ElementRef<'a>> {
    let selector = Selector::parse(css).ok()?;
    scope.select(&selector).next()
}

fn list_items(scope: ElementRef<'_>, css: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(css) else {
        return Vec::new();
    };
    scope.select(&selector).map(stripped_text).collect()
}

/// Text content with every fragment trimmed and concatenated.
fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

fn text_or_default(scope: ElementRef<'_>, css: &str) -> String {
    select_first(scope, css)
        .map(stripped_text)
        .and_then(|text| non_empty(&text))
        .unwrap_or_else(not_available)
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><head><title>Kost Melati Tebet</title></head><body>
            <h1 class="col-md-10"> Kost Melati Tebet </h1>
            <div class="seller-short"><ul><li class="name">Ibu Sari</li></ul></div>
            <div id="df_field_whatsapp"><div class="name">WhatsApp</div><div class="value">081234567890</div></div>
            <div id="df_field_price"><span>Rp 850.000</span></div>
            <div id="fs_1049">
                <div id="df_field_nama_kost"><div class="value">Melati</div></div>
                <div id="df_field_lokasi"><div class="value">DKI Jakarta</div></div>
                <div id="df_field_lokasi_level1"><div class="value">Jakarta Selatan</div></div>
                <div id="df_field_lokasi_level2"><div class="value">Tebet</div></div>
                <div id="df_field_lokasi_level3"><div class="value">Tebet Barat</div></div>
                <div id="df_field_address"><div class="value">Jl. Melati No. 5</div></div>
            </div>
            <div id="fs_1050">
                <div id="df_field_fasilitas_kamar"><ul><li>AC</li><li> Kasur </li></ul></div>
                <div id="df_field_fasilitas_kost"><ul><li>Dapur</li></ul></div>
                <div id="df_field_fasilitas_sekitar"><ul><li>Minimarket</li><li>Stasiun</li></ul></div>
            </div>
            <div id="df_field_additional_information">
                <div class="value"><p>Kost nyaman</p>
                    <p> dekat stasiun </p></div>
            </div>
        </body></html>
    "#;

    fn url() -> DetailUrl {
        DetailUrl::new("https://www.sewakost.com/kost-jakarta/kost-melati-1.html").expect("valid url")
    }

    #[test]
    fn test_full_record() {
        let record = extract_record(&Html::parse_document(FULL_PAGE), &url());

        assert_eq!(record.name, "Kost Melati Tebet");
        assert_eq!(record.owner, "Ibu Sari");
        assert_eq!(record.phone, "081234567890");
        assert_eq!(record.price, "Rp 850.000");
        assert_eq!(record.location.property_name, "Melati");
        assert_eq!(record.location.province, "DKI Jakarta");
        assert_eq!(record.location.city, "Jakarta Selatan");
        assert_eq!(record.location.district, "Tebet");
        assert_eq!(record.location.sub_district, "Tebet Barat");
        assert_eq!(record.location.address, "Jl. Melati No. 5");
        assert_eq!(record.facilities.room, vec!["AC", "Kasur"]);
        assert_eq!(record.facilities.shared, vec!["Dapur"]);
        assert_eq!(record.facilities.neighborhood, vec!["Minimarket", "Stasiun"]);
        assert_eq!(record.description, "Kost nyaman dekat stasiun");
        assert_eq!(record.url, url().as_str());
    }

    #[test]
    fn test_empty_document_defaults_everything() {
        let record = extract_record(&Html::parse_document("<html></html>"), &url());
        assert_eq!(record, ListingRecord::empty(&url()));
    }

    #[test]
    fn test_missing_location_fieldset_isolated() {
        let html = FULL_PAGE.replace("fs_1049", "fs_other");
        let record = extract_record(&Html::parse_document(&html), &url());

        assert_eq!(record.location, Location::default());
        assert_eq!(record.name, "Kost Melati Tebet");
        assert_eq!(record.phone, "081234567890");
        assert_eq!(record.facilities.shared, vec!["Dapur"]);
    }

    #[test]
    fn test_missing_location_subfield_keeps_siblings() {
        let html = FULL_PAGE.replace("df_field_lokasi_level2", "df_field_unknown");
        let location = location(&Html::parse_document(&html));

        assert_eq!(location.district, NOT_AVAILABLE);
        assert_eq!(location.city, "Jakarta Selatan");
        assert_eq!(location.sub_district, "Tebet Barat");
        assert_eq!(location.address, "Jl. Melati No. 5");
    }

    #[test]
    fn test_missing_facility_container_is_empty() {
        let html = FULL_PAGE.replace("df_field_fasilitas_kost", "df_field_gone");
        let facilities = facilities(&Html::parse_document(&html));

        assert!(facilities.shared.is_empty());
        assert_eq!(facilities.room, vec!["AC", "Kasur"]);
        assert_eq!(facilities.neighborhood, vec!["Minimarket", "Stasiun"]);
    }

    #[test]
    fn test_phone_show_number_link() {
        let html = r#"
            <div id="df_field_whatsapp"><div class="value">N/A</div></div>
            <div class="contact"><span>Lihat Nomor</span></div>
            <a href="tel:0219876543">Call</a>
            <span class="call-owner" data-phone="000"></span>
        "#;
        assert_eq!(phone(&Html::parse_document(html)), "0219876543");
    }

    #[test]
    fn test_phone_call_owner_attribute() {
        let html = r#"<span class="call-owner" data-phone=" 0811112222 "></span>"#;
        assert_eq!(phone(&Html::parse_document(html)), "0811112222");
    }

    #[test]
    fn test_phone_empty_tier_falls_through() {
        let html = r#"
            <div id="df_field_whatsapp"><div class="value">  </div></div>
            <span>Lihat Nomor</span><a href="tel:">hidden</a>
            <span class="call-owner" data-phone="0855"></span>
        "#;
        assert_eq!(phone(&Html::parse_document(html)), "0855");
    }

    #[test]
    fn test_phone_first_tier_wins() {
        let html = r#"
            <div id="df_field_whatsapp"><div class="value">0812</div></div>
            <span>Lihat Nomor</span><a href="tel:0899">call</a>
        "#;
        assert_eq!(phone(&Html::parse_document(html)), "0812");
    }

    #[test]
    fn test_phone_missing_everywhere() {
        let html = r#"<span>Hubungi</span><a href="/contact">contact</a>"#;
        assert_eq!(phone(&Html::parse_document(html)), NOT_AVAILABLE);
    }

    #[test]
    fn test_blank_heading_is_not_available() {
        let html = r#"<h1 class="col-md-10">   </h1>"#;
        assert_eq!(name(&Html::parse_document(html)), NOT_AVAILABLE);
    }
}
