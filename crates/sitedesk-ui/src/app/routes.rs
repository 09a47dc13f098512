//! Routing definitions for the Sitedesk UI.
use sitedesk_identity::role::Destination;
use yew_router::prelude::*;

#[derive(Clone, Routable, PartialEq, Eq, Debug)]
pub(crate) enum Route {
    #[at("/")]
    Home,
    #[at("/signin")]
    SignIn,
    #[at("/admin/signin")]
    AdminSignIn,
    #[at("/admin")]
    AdminHome,
    #[at("/portal")]
    ClientHome,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Map an auth-core destination onto a concrete route.
pub(crate) const fn route_for(destination: Destination) -> Route {
    match destination {
        Destination::Home => Route::Home,
        Destination::SignIn => Route::SignIn,
        Destination::AdminSignIn => Route::AdminSignIn,
        Destination::AdminHome => Route::AdminHome,
        Destination::ClientHome => Route::ClientHome,
    }
}
