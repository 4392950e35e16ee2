use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Permission {
    ManageUsers,
    ManageStaff,
    ManageApps,
    ManageChannels,
    ManageDiscounts,
    ManagePlugins,
    ManageGiftCard,
    ManageMenus,
    ManageOrders,
    ManagePages,
    ManageProducts,
    ManageShipping,
    ManageSettings,
    ManageTranslations,
    ManageCheckouts,
}

pub type PermissionSet = BTreeSet<Permission>;

impl Permission {
    pub const ALL: [Permission; 15] = [
        Permission::ManageUsers,
        Permission::ManageStaff,
        Permission::ManageApps,
        Permission::ManageChannels,
        Permission::ManageDiscounts,
        Permission::ManagePlugins,
        Permission::ManageGiftCard,
        Permission::ManageMenus,
        Permission::ManageOrders,
        Permission::ManagePages,
        Permission::ManageProducts,
        Permission::ManageShipping,
        Permission::ManageSettings,
        Permission::ManageTranslations,
        Permission::ManageCheckouts,
    ];

    /// Codename as stored in the database (`manage_apps`).
    pub fn codename(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ManageStaff => "manage_staff",
            Permission::ManageApps => "manage_apps",
            Permission::ManageChannels => "manage_channels",
            Permission::ManageDiscounts => "manage_discounts",
            Permission::ManagePlugins => "manage_plugins",
            Permission::ManageGiftCard => "manage_gift_card",
            Permission::ManageMenus => "manage_menus",
            Permission::ManageOrders => "manage_orders",
            Permission::ManagePages => "manage_pages",
            Permission::ManageProducts => "manage_products",
            Permission::ManageShipping => "manage_shipping",
            Permission::ManageSettings => "manage_settings",
            Permission::ManageTranslations => "manage_translations",
            Permission::ManageCheckouts => "manage_checkouts",
        }
    }

    /// Parses both the stored codename and the public enum name used in manifests
    /// (`manage_apps` and `MANAGE_APPS`).
    pub fn parse_code(code: &str) -> Option<Permission> {
        let normalized = code.trim().to_ascii_lowercase();
        Permission::ALL
            .iter()
            .copied()
            .find(|p| p.codename() == normalized)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.codename())
    }
}

#[derive(thiserror::Error, Debug)]
#[error("unknown permission `{0}`")]
pub struct UnknownPermission(pub String);

impl FromStr for Permission {
    type Err = UnknownPermission;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Permission::parse_code(s).ok_or_else(|| UnknownPermission(s.to_string()))
    }
}

pub fn codenames(perms: &PermissionSet) -> Vec<String> {
    perms.iter().map(|p| p.codename().to_string()).collect()
}

/// Stored codenames that no longer map to a permission are dropped.
pub fn from_codenames<I, S>(codes: I) -> PermissionSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .filter_map(|c| Permission::parse_code(c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codename_and_enum_name() {
        assert_eq!(
            Permission::parse_code("manage_orders"),
            Some(Permission::ManageOrders)
        );
        assert_eq!(
            Permission::parse_code("MANAGE_ORDERS"),
            Some(Permission::ManageOrders)
        );
        assert_eq!(Permission::parse_code("manage_everything"), None);
    }

    #[test]
    fn codenames_are_unique() {
        let set: BTreeSet<&str> = Permission::ALL.iter().map(|p| p.codename()).collect();
        assert_eq!(set.len(), Permission::ALL.len());
    }

    #[test]
    fn unknown_stored_codenames_are_skipped() {
        let perms = from_codenames(["manage_apps", "legacy_perm"]);
        assert_eq!(perms.into_iter().collect::<Vec<_>>(), vec![Permission::ManageApps]);
    }
}
