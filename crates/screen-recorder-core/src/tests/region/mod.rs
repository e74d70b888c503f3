mod bounding_box;
