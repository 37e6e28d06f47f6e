//! Fixed route and navigation tables per role.

use serde::Serialize;

use crate::models::Role;

/// Concrete views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum View {
    Login,
    // admin
    AdminDashboard,
    DoctorRegistration,
    Patients,
    DoctorList,
    AdminPrescriptions,
    Appointments,
    Billing,
    Reports,
    Analytics,
    PatientForm,
    AppointmentForm,
    BillingTable,
    // doctor
    DoctorDashboard,
    PatientList,
    PatientDetails,
    AppointmentSchedule,
    Consultation,
    Prescriptions,
    FollowUps,
    // both
    Inventory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    pub pattern: &'static str,
    pub view: View,
}

const fn route(pattern: &'static str, view: View) -> RouteEntry {
    RouteEntry { pattern, view }
}

const ADMIN_ROUTES: &[RouteEntry] = &[
    route("/dashboard", View::AdminDashboard),
    route("/doctor-registration", View::DoctorRegistration),
    route("/patients", View::Patients),
    route("/doctor", View::DoctorList),
    route("/admin-prescriptions", View::AdminPrescriptions),
    route("/appointments", View::Appointments),
    route("/billing", View::Billing),
    route("/reports", View::Reports),
    route("/analytics", View::Analytics),
    route("/add-patient", View::PatientForm),
    route("/new-appointment", View::AppointmentForm),
    route("/view-bill", View::BillingTable),
    route("/inventory", View::Inventory),
];

const DOCTOR_ROUTES: &[RouteEntry] = &[
    route("/dashboard", View::DoctorDashboard),
    route("/patient-list", View::PatientList),
    route("/patient-details/:id", View::PatientDetails),
    route("/appointments", View::AppointmentSchedule),
    route("/consultation", View::Consultation),
    route("/prescription", View::Prescriptions),
    route("/followups", View::FollowUps),
    route("/inventory", View::Inventory),
];

/// Reachable routes for a role, in registration order.
pub fn routes(role: Role) -> &'static [RouteEntry] {
    match role {
        Role::Admin => ADMIN_ROUTES,
        Role::Doctor => DOCTOR_ROUTES,
    }
}

/// One entry of the persistent sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub name: &'static str,
    pub path: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<&'static str>,
}

const fn link(name: &'static str, path: &'static str, group: Option<&'static str>) -> NavLink {
    NavLink { name, path, group }
}

const ADMIN_NAV: &[NavLink] = &[
    link("Dashboard", "/dashboard", Some("Main")),
    link("DoctorList", "/doctor", Some("Doctors")),
    link("Doctor Registration", "/doctor-registration", Some("Doctors")),
    link("Doctor Prescriptions", "/admin-prescriptions", Some("Doctors")),
    link("Patients", "/patients", Some("Main")),
    link("Appointments", "/appointments", Some("Main")),
    link("Billing", "/billing", Some("Main")),
    link("Reports", "/reports", Some("Analytics")),
    link("Analytics", "/analytics", Some("Analytics")),
    link("Inventory", "/inventory", Some("Inventory")),
];

const DOCTOR_NAV: &[NavLink] = &[
    link("Dashboard", "/dashboard", None),
    link("Patient List", "/patient-list", None),
    link("Appointments", "/appointments", None),
    link("Consultation", "/consultation", None),
    link("Prescriptions", "/prescription", None),
    link("Follow Ups", "/followups", None),
    link("Inventory", "/inventory", None),
];

pub fn nav_links(role: Role) -> &'static [NavLink] {
    match role {
        Role::Admin => ADMIN_NAV,
        Role::Doctor => DOCTOR_NAV,
    }
}
