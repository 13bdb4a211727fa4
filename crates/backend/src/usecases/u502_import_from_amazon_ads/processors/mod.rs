pub mod sponsored_ads;
