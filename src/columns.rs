//! The GIAS "all establishments" column table, one entry per raw CSV column.
//!
//! Entries are in the physical column order of the published extract. Columns
//! that look numeric but are identifiers (URN, UKPRN, UPRN, establishment
//! numbers, phone numbers, type codes) carry an explicit string directive so a
//! leading zero or "+" prefix is never lost; they are identifiers, not
//! measurements.

use std::sync::OnceLock;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{
    category::SEN_NEED_CATEGORIES,
    data::GIAS_DATE_FORMAT,
    schema::{ColumnSpec, ParseRule, SchemaRegistry},
};

/// Extract layouts the registry knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Release {
    /// Extracts published before the accreditation and QAB columns were added.
    Legacy,
    Current,
}

impl Release {
    pub fn for_date(extract_date: NaiveDate) -> Self {
        if extract_date < current_release_cutover() {
            Release::Legacy
        } else {
            Release::Current
        }
    }

    fn columns(self) -> &'static [ColumnSpec] {
        match self {
            Release::Legacy => &ESTABLISHMENT_COLUMNS[..LEGACY_COLUMN_COUNT],
            Release::Current => ESTABLISHMENT_COLUMNS,
        }
    }
}

fn current_release_cutover() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 9, 1).unwrap_or(NaiveDate::MIN)
}

static LEGACY_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
static CURRENT_REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();

/// The registry for `release`, built and validated on first use.
///
/// A duplicate in the bundled column table is a build defect, so this aborts
/// instead of returning an error.
pub fn registry_for(release: Release) -> &'static SchemaRegistry {
    let cell = match release {
        Release::Legacy => &LEGACY_REGISTRY,
        Release::Current => &CURRENT_REGISTRY,
    };
    cell.get_or_init(|| {
        SchemaRegistry::from_specs(release.columns())
            .unwrap_or_else(|err| panic!("Invalid {release:?} column table: {err}"))
    })
}

pub fn current() -> &'static SchemaRegistry {
    registry_for(Release::Current)
}

/// Raw names of the thirteen SEN provision slot columns, slot order.
pub const SEN_SLOT_COLUMNS: [&str; 13] = [
    "SEN1 (name)",
    "SEN2 (name)",
    "SEN3 (name)",
    "SEN4 (name)",
    "SEN5 (name)",
    "SEN6 (name)",
    "SEN7 (name)",
    "SEN8 (name)",
    "SEN9 (name)",
    "SEN10 (name)",
    "SEN11 (name)",
    "SEN12 (name)",
    "SEN13 (name)",
];

pub const RESOURCED_PROVISION_COLUMN: &str = "TypeOfResourcedProvision (name)";

const fn text(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: None,
    }
}

const fn code(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: Some(ParseRule::String),
    }
}

const fn integer(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: Some(ParseRule::Integer),
    }
}

const fn float(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: Some(ParseRule::Float),
    }
}

const fn date(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: Some(ParseRule::Date(GIAS_DATE_FORMAT)),
    }
}

const fn sen_need(raw: &'static str, id: &'static str, label: &'static str) -> ColumnSpec {
    ColumnSpec {
        raw,
        id,
        label,
        rule: Some(ParseRule::Category(&SEN_NEED_CATEGORIES)),
    }
}

// Everything from `QABName (code)` onwards only exists in current extracts.
const LEGACY_COLUMN_COUNT: usize = 130;

static ESTABLISHMENT_COLUMNS: &[ColumnSpec] = &[
    code("URN", "urn", "URN"),
    code("LA (code)", "la_code", "LA"),
    text("LA (name)", "la_name", "LA name"),
    code("EstablishmentNumber", "establishment_number", "Establishment Number"),
    text("EstablishmentName", "establishment_name", "School / College Name"),
    code("TypeOfEstablishment (code)", "type_of_establishment_code", "Establishment type code"),
    text("TypeOfEstablishment (name)", "type_of_establishment_name", "Establishment type"),
    code("EstablishmentTypeGroup (code)", "establishment_type_group_code", "Establishment type group code"),
    text("EstablishmentTypeGroup (name)", "establishment_type_group_name", "Establishment type group"),
    code("EstablishmentStatus (code)", "establishment_status_code", "Establishment status code"),
    text("EstablishmentStatus (name)", "establishment_status_name", "Establishment status"),
    code("ReasonEstablishmentOpened (code)", "reason_establishment_opened_code", "Reason establishment opened code"),
    text("ReasonEstablishmentOpened (name)", "reason_establishment_opened_name", "Reason establishment opened"),
    date("OpenDate", "open_date", "Open date"),
    code("ReasonEstablishmentClosed (code)", "reason_establishment_closed_code", "Reason establishment closed code"),
    text("ReasonEstablishmentClosed (name)", "reason_establishment_closed_name", "Reason establishment closed"),
    date("CloseDate", "close_date", "Close date"),
    code("PhaseOfEducation (code)", "phase_of_education_code", "Phase of education code"),
    text("PhaseOfEducation (name)", "phase_of_education_name", "Phase of education"),
    integer("StatutoryLowAge", "statutory_low_age", "Age range (low)"),
    integer("StatutoryHighAge", "statutory_high_age", "Age range (high)"),
    code("Boarders (code)", "boarders_code", "Boarders code"),
    text("Boarders (name)", "boarders_name", "Boarders"),
    text("NurseryProvision (name)", "nursery_provision_name", "Nursery provision"),
    code("OfficialSixthForm (code)", "official_sixth_form_code", "Official sixth form code"),
    text("OfficialSixthForm (name)", "official_sixth_form_name", "Official sixth form"),
    code("Gender (code)", "gender_code", "Gender of entry code"),
    text("Gender (name)", "gender_name", "Gender of entry"),
    code("ReligiousCharacter (code)", "religious_character_code", "Religious character code"),
    text("ReligiousCharacter (name)", "religious_character_name", "Religious character"),
    text("ReligiousEthos (name)", "religious_ethos_name", "Religious ethos"),
    code("Diocese (code)", "diocese_code", "Diocese code"),
    text("Diocese (name)", "diocese_name", "Diocese"),
    code("AdmissionsPolicy (code)", "admissions_policy_code", "Admissions policy code"),
    text("AdmissionsPolicy (name)", "admissions_policy_name", "Admissions policy"),
    integer("SchoolCapacity", "school_capacity", "School capacity"),
    code("SpecialClasses (code)", "special_classes_code", "Special classes code"),
    text("SpecialClasses (name)", "special_classes_name", "Special classes"),
    date("CensusDate", "census_date", "Census date"),
    integer("NumberOfPupils", "number_of_pupils", "Number of pupils"),
    integer("NumberOfBoys", "number_of_boys", "Number of boys"),
    integer("NumberOfGirls", "number_of_girls", "Number of girls"),
    float("PercentageFSM", "percentage_fsm", "Percentage of pupils eligible for free school meals"),
    code("TrustSchoolFlag (code)", "trust_school_flag_code", "Trust school flag code"),
    text("TrustSchoolFlag (name)", "trust_school_flag_name", "Trust school flag"),
    code("Trusts (code)", "trusts_code", "Academy trust or trust UID"),
    text("Trusts (name)", "trusts_name", "Academy trust or trust name"),
    text("SchoolSponsorFlag (name)", "school_sponsor_flag_name", "School sponsor flag"),
    text("SchoolSponsors (name)", "school_sponsors_name", "Academy sponsor name"),
    text("FederationFlag (name)", "federation_flag_name", "Federation flag"),
    code("Federations (code)", "federations_code", "Federation UID"),
    text("Federations (name)", "federations_name", "Federation name"),
    code("UKPRN", "ukprn", "UK provider reference number"),
    code("FEHEIdentifier", "fehe_identifier", "FE/HE identifier"),
    text("FurtherEducationType (name)", "further_education_type_name", "Further education type"),
    date("OfstedLastInsp", "ofsted_last_insp", "Date of last full Ofsted inspection"),
    code("OfstedSpecialMeasures (code)", "ofsted_special_measures_code", "Ofsted special measures code"),
    text("OfstedSpecialMeasures (name)", "ofsted_special_measures_name", "Ofsted special measures"),
    date("LastChangedDate", "last_changed_date", "Last changed date"),
    text("Street", "street", "Street"),
    text("Locality", "locality", "Locality"),
    text("Address3", "address3", "Address 3"),
    text("Town", "town", "Town"),
    text("County (name)", "county_name", "County"),
    code("Postcode", "postcode", "Postcode"),
    text("SchoolWebsite", "school_website", "Website"),
    code("TelephoneNum", "telephone_num", "Telephone"),
    text("HeadTitle (name)", "head_title_name", "Headteacher title"),
    text("HeadFirstName", "head_first_name", "Headteacher first name"),
    text("HeadLastName", "head_last_name", "Headteacher last name"),
    text("HeadPreferredJobTitle", "head_preferred_job_title", "Headteacher preferred job title"),
    text("BSOInspectorateName (name)", "bso_inspectorate_name_name", "BSO inspectorate name"),
    text("InspectorateReport", "inspectorate_report", "Inspectorate report URL"),
    date("DateOfLastInspectionVisit", "date_of_last_inspection_visit", "Date of last inspection visit"),
    date("NextInspectionVisit", "next_inspection_visit", "Date of next inspection visit"),
    text("TeenMoth (name)", "teen_moth_name", "Teenage mothers provision"),
    integer("TeenMothPlaces", "teen_moth_places", "Teenage mothers places"),
    text("CCF (name)", "ccf_name", "Child care facilities"),
    text("SENPRU (name)", "senpru_name", "PRU provision for SEN"),
    text("EBD (name)", "ebd_name", "PRU provision for EBD"),
    integer("PlacesPRU", "places_pru", "Number of PRU places"),
    text("FTProv (name)", "ft_prov_name", "Full time provision"),
    text("EdByOther (name)", "ed_by_other_name", "Pupils educated by other providers"),
    text("Section41Approved (name)", "section41_approved_name", "Section 41 approved"),
    sen_need("SEN1 (name)", "sen1_name", "SEN need 1"),
    sen_need("SEN2 (name)", "sen2_name", "SEN need 2"),
    sen_need("SEN3 (name)", "sen3_name", "SEN need 3"),
    sen_need("SEN4 (name)", "sen4_name", "SEN need 4"),
    sen_need("SEN5 (name)", "sen5_name", "SEN need 5"),
    sen_need("SEN6 (name)", "sen6_name", "SEN need 6"),
    sen_need("SEN7 (name)", "sen7_name", "SEN need 7"),
    sen_need("SEN8 (name)", "sen8_name", "SEN need 8"),
    sen_need("SEN9 (name)", "sen9_name", "SEN need 9"),
    sen_need("SEN10 (name)", "sen10_name", "SEN need 10"),
    sen_need("SEN11 (name)", "sen11_name", "SEN need 11"),
    sen_need("SEN12 (name)", "sen12_name", "SEN need 12"),
    sen_need("SEN13 (name)", "sen13_name", "SEN need 13"),
    text("TypeOfResourcedProvision (name)", "type_of_resourced_provision_name", "Type of resourced provision"),
    integer("ResourcedProvisionOnRoll", "resourced_provision_on_roll", "Resourced provision number on roll"),
    integer("ResourcedProvisionCapacity", "resourced_provision_capacity", "Resourced provision capacity"),
    integer("SenUnitOnRoll", "sen_unit_on_roll", "SEN unit number on roll"),
    integer("SenUnitCapacity", "sen_unit_capacity", "SEN unit capacity"),
    code("GOR (code)", "gor_code", "GOR code"),
    text("GOR (name)", "gor_name", "GOR"),
    code("DistrictAdministrative (code)", "district_administrative_code", "District administrative code"),
    text("DistrictAdministrative (name)", "district_administrative_name", "District administrative"),
    code("AdministrativeWard (code)", "administrative_ward_code", "Administrative ward code"),
    text("AdministrativeWard (name)", "administrative_ward_name", "Administrative ward"),
    code("ParliamentaryConstituency (code)", "parliamentary_constituency_code", "Parliamentary constituency code"),
    text("ParliamentaryConstituency (name)", "parliamentary_constituency_name", "Parliamentary constituency"),
    code("UrbanRural (code)", "urban_rural_code", "Urban rural code"),
    text("UrbanRural (name)", "urban_rural_name", "Urban rural"),
    code("GSSLACode (name)", "gssla_code_name", "GSSLA code"),
    integer("Easting", "easting", "Easting"),
    integer("Northing", "northing", "Northing"),
    text("MSOA (name)", "msoa_name", "MSOA"),
    text("LSOA (name)", "lsoa_name", "LSOA"),
    text("InspectorateName (name)", "inspectorate_name_name", "Inspectorate name"),
    integer("SENStat", "sen_stat", "Number of special pupils under a SEN statement or EHCP"),
    integer("SENNoStat", "sen_no_stat", "Number of special pupils not under a SEN statement or EHCP"),
    text("BoardingEstablishment (name)", "boarding_establishment_name", "Boarding establishment"),
    text("PropsName", "props_name", "Proprietor's name"),
    code("PreviousLA (code)", "previous_la_code", "Previous local authority code"),
    text("PreviousLA (name)", "previous_la_name", "Previous local authority"),
    code("PreviousEstablishmentNumber", "previous_establishment_number", "Previous establishment number"),
    text("OfstedRating (name)", "ofsted_rating_name", "Ofsted rating"),
    text("RSCRegion (name)", "rsc_region_name", "RSC region"),
    text("Country (name)", "country_name", "Country"),
    code("UPRN", "uprn", "UPRN"),
    text("SiteName", "site_name", "Site name"),
    code("QABName (code)", "qab_name_code", "QAB name code"),
    text("QABName (name)", "qab_name_name", "QAB name"),
    code("EstablishmentAccredited (code)", "establishment_accredited_code", "Establishment accredited code"),
    text("EstablishmentAccredited (name)", "establishment_accredited_name", "Establishment accredited"),
    text("QABReport", "qab_report", "QAB report"),
    code("CHNumber", "ch_number", "Companies House number"),
    code("MSOA (code)", "msoa_code", "MSOA code"),
    code("LSOA (code)", "lsoa_code", "LSOA code"),
    integer("FSM", "fsm", "Number of pupils eligible for free school meals"),
    date("AccreditationExpiryDate", "accreditation_expiry_date", "Accreditation expiry date"),
];

/// Rows for a `#, raw name, id, type, label` listing of `registry`.
pub fn listing_rows(registry: &SchemaRegistry) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = ["#", "raw name", "id", "type", "label"]
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows = registry
        .descriptors()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            vec![
                (idx + 1).to_string(),
                column.raw_name.clone(),
                column.normalized_id.clone(),
                column.parse_rule().to_string(),
                column.label.clone(),
            ]
        })
        .collect();
    (headers, rows)
}
