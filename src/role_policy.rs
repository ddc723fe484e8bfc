//! Pure role-to-capability rules. No I/O, no actor state; every decision the
//! rest of the system makes about what a role may do routes through here.

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Top-level destinations the app can land a user on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// Public entry point for anyone not signed in.
    Landing,
    /// Browse-and-buy surface for the demand side.
    HomeFeed,
    /// Listing management and redemption surface for the supply side.
    SellerDashboard,
    /// Oversight surface.
    AdminDashboard,
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Route::Landing => "landing",
            Route::HomeFeed => "home_feed",
            Route::SellerDashboard => "seller_dashboard",
            Route::AdminDashboard => "admin_dashboard",
        };
        f.write_str(name)
    }
}

/// Where a freshly signed-in user of this role starts.
pub fn landing_route(role: Role) -> Route {
    match role {
        Role::Consumer | Role::Ngo => Route::HomeFeed,
        Role::Restaurant | Role::Grocery => Route::SellerDashboard,
        Role::Admin => Route::AdminDashboard,
    }
}

/// Landing destination for the current session state. `None` is the
/// signed-out case.
pub fn landing_for(role: Option<&Role>) -> Route {
    match role {
        Some(role) => landing_route(*role),
        None => Route::Landing,
    }
}

/// Every route a role is allowed to visit, in display order. Admin sees
/// everything; other roles see their own surface plus the public one.
pub fn allowed_routes(role: Role) -> &'static [Route] {
    match role {
        Role::Consumer | Role::Ngo => &[Route::Landing, Route::HomeFeed],
        Role::Restaurant | Role::Grocery => &[Route::Landing, Route::SellerDashboard],
        Role::Admin => &[
            Route::Landing,
            Route::HomeFeed,
            Route::SellerDashboard,
            Route::AdminDashboard,
        ],
    }
}

/// Only the demand side places orders.
pub fn may_checkout(role: Role) -> bool {
    matches!(role, Role::Consumer | Role::Ngo)
}

/// Sellers redeem at the counter; admin may step in on their behalf.
pub fn may_redeem(role: Role) -> bool {
    role.is_seller() || matches!(role, Role::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_role_lands_on_its_own_surface() {
        assert_eq!(landing_route(Role::Consumer), Route::HomeFeed);
        assert_eq!(landing_route(Role::Ngo), Route::HomeFeed);
        assert_eq!(landing_route(Role::Restaurant), Route::SellerDashboard);
        assert_eq!(landing_route(Role::Grocery), Route::SellerDashboard);
        assert_eq!(landing_route(Role::Admin), Route::AdminDashboard);
    }

    #[test]
    fn signed_out_users_land_on_the_public_page() {
        assert_eq!(landing_for(None), Route::Landing);
        assert_eq!(landing_for(Some(&Role::Ngo)), Route::HomeFeed);
    }

    #[test]
    fn landing_route_is_always_allowed() {
        for role in Role::ALL {
            let landing = landing_route(role);
            assert!(
                allowed_routes(role).contains(&landing),
                "{role} may not visit its own landing route"
            );
        }
    }

    #[test]
    fn checkout_is_reserved_for_the_demand_side() {
        assert!(may_checkout(Role::Consumer));
        assert!(may_checkout(Role::Ngo));
        assert!(!may_checkout(Role::Restaurant));
        assert!(!may_checkout(Role::Grocery));
        assert!(!may_checkout(Role::Admin));
    }

    #[test]
    fn redemption_is_reserved_for_sellers_and_admin() {
        assert!(may_redeem(Role::Restaurant));
        assert!(may_redeem(Role::Grocery));
        assert!(may_redeem(Role::Admin));
        assert!(!may_redeem(Role::Consumer));
        assert!(!may_redeem(Role::Ngo));
    }

    #[test]
    fn no_role_both_buys_and_redeems() {
        for role in Role::ALL {
            if role == Role::Admin {
                continue;
            }
            assert!(
                !(may_checkout(role) && may_redeem(role)),
                "{role} may both checkout and redeem"
            );
        }
    }
}
